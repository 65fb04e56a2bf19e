use super::ConnectorError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// `${name}` placeholder in a URL template
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{(\w+)\}").unwrap());

/// Connection URL template with optional default values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUrlBuilder {
    template: String,
    defaults: BTreeMap<String, String>,
}

impl ConnectionUrlBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            defaults: BTreeMap::new(),
        }
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in template order
    pub fn variables(&self) -> Vec<&str> {
        PLACEHOLDER_RE
            .captures_iter(&self.template)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Expand the template; explicit parameters override defaults
    pub fn build(&self, params: &BTreeMap<String, String>) -> Result<String, ConnectorError> {
        let mut url = String::with_capacity(self.template.len() + 32);
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(&self.template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = params
                .get(name.as_str())
                .or_else(|| self.defaults.get(name.as_str()))
                .ok_or_else(|| ConnectorError::MissingUrlParameter {
                    name: name.as_str().to_string(),
                    template: self.template.clone(),
                })?;
            url.push_str(&self.template[last..whole.start()]);
            url.push_str(value);
            last = whole.end();
        }
        url.push_str(&self.template[last..]);

        Ok(url)
    }
}
