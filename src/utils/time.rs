use chrono::{Local, NaiveDate};

pub const ISO_DATE_FMT: &str = "%Y-%m-%d";

pub fn current_human_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FMT).to_string()
}
