//! Regex patterns used to read format specifiers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Standard format specifier:
    //   [[fill]align][sign][#][0][width][,|_][.precision][type]
    // The sign slot takes any punctuation so bad signs are reported as such.
    pub static ref FORMAT_SPEC: Regex = Regex::new(
        r"^(?s:(?:(?P<fill>.)?(?P<align>[<>=^]))?(?P<sign>[^0-9A-Za-z#.,_%<>=^])?(?P<alternate>#)?(?P<zero>0)?(?P<width>[0-9]+)?(?P<grouping>[,_])?(?P<precision>\.[0-9]+)?(?P<type>[A-Za-z%]+)?)$"
    ).unwrap();
}
