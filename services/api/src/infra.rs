use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read the rule set from disk, attaching the path so a startup failure names
/// the file that could not be loaded.
pub(crate) fn load_rules(path: &Path) -> Result<String, std::io::Error> {
    std::fs::read_to_string(path).map_err(|err| {
        std::io::Error::new(
            err.kind(),
            format!("failed to read rule set at {}: {err}", path.display()),
        )
    })
}

pub(crate) fn parse_yes_no(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(format!("expected yes or no, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_yes_no_accepts_common_spellings() {
        for raw in ["yes", "Yes", "y", "true", " TRUE "] {
            assert_eq!(parse_yes_no(raw), Ok(true), "'{raw}' should read as yes");
        }
        for raw in ["no", "No", "n", "false"] {
            assert_eq!(parse_yes_no(raw), Ok(false), "'{raw}' should read as no");
        }
    }

    #[test]
    fn parse_yes_no_rejects_anything_else() {
        assert!(parse_yes_no("maybe").is_err());
        assert!(parse_yes_no("").is_err());
    }

    #[test]
    fn load_rules_failures_name_the_file() {
        let error = load_rules(Path::new("no/such/rules.pl")).expect_err("file is absent");
        assert!(error.to_string().contains("no/such/rules.pl"));
    }
}
