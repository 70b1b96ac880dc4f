use crate::error::ConfigError;

/// Largest number of fractional digits that still says something about an `f64`
pub const MAX_PRECISION: usize = 17;

/// How a script run formats its output and treats failing queries
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    precision: usize,
    vacancy_label: String,
    strict: bool,
}

impl Config {
    /// Create a new builder for constructing a configuration
    ///
    /// # Examples
    ///
    /// ```
    /// use avlrank::Config;
    ///
    /// // Defaults: three decimals, "nobody", lenient
    /// let config = Config::builder().build().unwrap();
    ///
    /// let config = Config::builder()
    ///     .precision(1)
    ///     .vacancy_label("vacant")
    ///     .strict(true)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Digits printed after the decimal point of a rank
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Printed in place of a replacement when a departing member leaves no one behind
    pub fn vacancy_label(&self) -> &str {
        &self.vacancy_label
    }

    /// Whether a failing query aborts the run instead of being skipped
    pub fn strict(&self) -> bool {
        self.strict
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            precision: 3,
            vacancy_label: "nobody".to_string(),
            strict: false,
        }
    }
}

/// Builder for [`Config`] with validation and defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    precision: Option<usize>,
    vacancy_label: Option<String>,
    strict: Option<bool>,
}

impl ConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of digits after the decimal point
    ///
    /// Must be at most [`MAX_PRECISION`].
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Set the label printed when nobody replaces a departing member
    ///
    /// Must be a single non-empty word so output lines stay splittable on whitespace.
    pub fn vacancy_label(mut self, label: impl Into<String>) -> Self {
        self.vacancy_label = Some(label.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Build the configuration with validation
    ///
    /// Uses the following defaults if not specified:
    /// - `precision: 3`
    /// - `vacancy_label: "nobody"`
    /// - `strict: false`
    pub fn build(self) -> Result<Config, ConfigError> {
        let defaults = Config::default();

        let precision = self.precision.unwrap_or(defaults.precision);
        if precision > MAX_PRECISION {
            return Err(ConfigError::Precision {
                got: precision,
                max: MAX_PRECISION,
            });
        }

        let vacancy_label = self.vacancy_label.unwrap_or(defaults.vacancy_label);
        if vacancy_label.is_empty() || vacancy_label.chars().any(char::is_whitespace) {
            return Err(ConfigError::VacancyLabel(vacancy_label));
        }

        Ok(Config {
            precision,
            vacancy_label,
            strict: self.strict.unwrap_or(defaults.strict),
        })
    }
}
