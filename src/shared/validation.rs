use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating phone numbers
    /// Optional leading +, then digits with single spaces, dots or hyphens
    /// - Valid: "+39 06 1234567", "06-1234567", "3331234567"
    /// - Invalid: "abc", "06--123", "+", "123"
    pub static ref PHONE_REGEX: Regex =
        Regex::new(r"^\+?[0-9]{2,}(?:[ .\-][0-9]+)*$").unwrap();

    /// Regex for validating person names (operators, patients)
    /// Letters including accented ones, with single spaces, apostrophes or hyphens
    /// - Valid: "Maria", "D'Angelo", "De Luca", "Anna-Lisa", "Niccolò"
    /// - Invalid: "", " Maria", "Maria1", "Maria  Rossi"
    pub static ref PERSON_NAME_REGEX: Regex =
        Regex::new(r"^\p{L}+(?:[ '\-]\p{L}+)*$").unwrap();
}
