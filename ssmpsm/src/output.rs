use std::io::{self, IsTerminal, Write};

use crossterm::style::Stylize;
use serde_json::{Value, json};
use tracing::warn;

use crate::{
    domain::{Parameter, ParameterName, ParameterType, ParameterVersion},
    error::ParameterError,
};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

/// Terminal renderer. Values go to stdout, everything else to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    color: bool,
    format: OutputFormat,
}

impl Output {
    pub fn new(color: bool, format: OutputFormat) -> Self {
        Self { color, format }
    }

    /// Color only when asked for, `NO_COLOR` is unset, and stderr is a terminal.
    pub fn detect(no_color: bool, format: OutputFormat) -> Self {
        let color = !no_color
            && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
            && io::stderr().is_terminal();
        Self::new(color, format)
    }

    pub fn render_parameter(&self, parameter: &Parameter) -> String {
        match self.format {
            OutputFormat::Plain => parameter.value().to_string(),
            OutputFormat::Json => parameter_json(parameter).to_string(),
        }
    }

    /// `None` when there is nothing for stdout (plain `set` only confirms on stderr).
    pub fn render_written(
        &self,
        name: &ParameterName,
        version: ParameterVersion,
        parameter_type: ParameterType,
    ) -> Option<String> {
        match self.format {
            OutputFormat::Plain => None,
            OutputFormat::Json => Some(
                json!({
                    "name": name.as_str(),
                    "version": version.as_i64(),
                    "type": parameter_type.as_str(),
                })
                .to_string(),
            ),
        }
    }

    pub fn render_confirmation(&self, name: &ParameterName, version: ParameterVersion) -> String {
        let text = format!("Parameter {} set to version {}", name, version);
        if self.color {
            text.green().to_string()
        } else {
            text
        }
    }

    pub fn render_error(&self, err: &ParameterError) -> String {
        if self.color {
            format!("{} {}", "error:".red().bold(), err)
        } else {
            format!("error: {}", err)
        }
    }

    pub fn print_parameter(&self, parameter: &Parameter) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", self.render_parameter(parameter))
    }

    pub fn print_written(
        &self,
        name: &ParameterName,
        version: ParameterVersion,
        parameter_type: ParameterType,
    ) -> io::Result<()> {
        self.write_written(
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
            name,
            version,
            parameter_type,
        )
    }

    /// The write already happened, so a confirmation that can't be shown is only logged.
    pub fn write_written<O, E>(
        &self,
        out: &mut O,
        err: &mut E,
        name: &ParameterName,
        version: ParameterVersion,
        parameter_type: ParameterType,
    ) -> io::Result<()>
    where
        O: Write,
        E: Write,
    {
        if let Some(line) = self.render_written(name, version, parameter_type) {
            writeln!(out, "{}", line)?;
        }
        if let Err(e) = writeln!(err, "{}", self.render_confirmation(name, version)) {
            warn!(error = %e, name = name.as_str(), "Could not print confirmation");
        }
        Ok(())
    }

    pub fn print_error(&self, err: &ParameterError) {
        let _ = writeln!(io::stderr().lock(), "{}", self.render_error(err));
    }
}

fn parameter_json(parameter: &Parameter) -> Value {
    serde_json::to_value(parameter).unwrap_or_else(|_| {
        json!({
            "name": parameter.name().as_str(),
            "value": parameter.value(),
        })
    })
}
