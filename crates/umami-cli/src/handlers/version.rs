//! Version command handler

use crate::error::Result;
use crate::output::OutputWriter;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    core_version: &'static str,
    os: &'static str,
    arch: &'static str,
}

impl VersionInfo {
    fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            core_version: umami_core::VERSION,
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}

/// Handle `version`
pub fn handle_version(output: &mut OutputWriter) -> Result<()> {
    let info = VersionInfo::current();
    if output.format().is_structured() {
        return output.data(&info);
    }

    output.writeln(&format!("umami version {}", info.version))?;
    output.writeln(&format!("core: {}", info.core_version))?;
    output.writeln(&format!("platform: {}/{}", info.os, info.arch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::handlers::test_support::output;

    #[test]
    fn test_human_version() {
        let (mut out, buffer) = output(OutputFormat::Human);
        handle_version(&mut out).unwrap();

        let printed = buffer.contents();
        assert!(printed.starts_with(&format!("umami version {}\n", env!("CARGO_PKG_VERSION"))));
        assert!(printed.contains(&format!("platform: {}/", std::env::consts::OS)));
    }

    #[test]
    fn test_structured_version() {
        let (mut out, buffer) = output(OutputFormat::Json);
        handle_version(&mut out).unwrap();

        let value: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
        assert_eq!(value["name"], "umami-cli");
        assert_eq!(value["core_version"], umami_core::VERSION);
    }
}
