use std::fmt::{Display, Error as FmtError, Formatter};

use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApodDate(NaiveDate);

#[derive(Clone)]
pub struct ApodDateValueParser;

impl clap::builder::TypedValueParser for ApodDateValueParser {
    type Value = ApodDate;
    fn parse_ref(&self, _cmd: &clap::Command, _arg: Option<&clap::Arg>, value: &std::ffi::OsStr) -> Result<Self::Value, clap::Error> {
        use clap::error::{Error, ErrorKind};
        match ApodDate::try_parse(value.to_string_lossy().as_ref()) {
            Some(d) => Ok(d),
            None => Err(Error::raw(ErrorKind::InvalidValue, "Use format YYYY-MM-DD, no earlier than 1995-06-16")),
        }
    }
}

impl ApodDate {
    pub fn try_parse(input: &str) -> Option<ApodDate> {
        let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()?;
        // The first picture was published on 1995-06-16
        let first = NaiveDate::from_ymd_opt(1995, 6, 16)?;
        if date < first {
            return None;
        }
        Some(ApodDate(date))
    }
}

impl Display for ApodDate {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
