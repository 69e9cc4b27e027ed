//! HTML pages served by the front end

use chrono::NaiveDate;
use minijinja::{Environment, context};

use crate::error::Result;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

/// Compiled page templates.
///
/// Template names end in `.html`, so every interpolated value is HTML-escaped.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;
        env.add_template("error.html", ERROR_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Landing page with the search box and analysis form
    pub fn index(&self, today: NaiveDate) -> Result<String> {
        let template = self.env.get_template("index.html")?;
        Ok(template.render(context! {
            max_date => today.to_string(),
            year => today.format("%Y").to_string(),
        })?)
    }

    /// "Analysis Error" document around a one-line message
    pub fn error(&self, message: &str) -> Result<String> {
        let template = self.env.get_template("error.html")?;
        Ok(template.render(context! { message })?)
    }
}
