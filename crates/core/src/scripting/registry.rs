//! Registered admin jobs and their command lines.

use std::collections::BTreeMap;

use serde::Serialize;

/// Concurrency class of a job.
///
/// Heavy jobs share a single process-wide slot; light jobs always start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobClass {
    Light,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptJob {
    pub name: String,
    pub class: JobClass,
    /// Program followed by its arguments.
    pub argv: Vec<String>,
}

/// Heavy jobs: `(name, python module, extra args)`.
const HEAVY_JOBS: &[(&str, &str, &[&str])] = &[
    ("enrich_metadata_trailers", "scripts.enrich_metadata_trailers", &["--limit", "200"]),
    ("smart_omdb_enrichment", "scripts.smart_omdb_enrichment", &["--limit", "200"]),
    ("track_missing_movies", "scripts.track_missing_movies", &["--find", "100", "--save"]),
    ("discover_new_movies", "scripts.discover_new_movies", &["--import-from-json"]),
    ("daily_ott_checker", "scripts.daily_ott_checker", &[]),
];

const LIGHT_JOBS: &[(&str, &str, &[&str])] = &[
    ("export_db", "scripts.export_db", &[]),
    ("manage_ott_links_report", "scripts.manage_ott_links", &["--report"]),
    ("complete_enrichment", "scripts.complete_enrichment", &["--dry-run"]),
];

/// The set of jobs an admin may trigger. Unknown names are not runnable.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    jobs: BTreeMap<String, ScriptJob>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard job set, each run as `<python_bin> -m <module> [args]`.
    pub fn standard(python_bin: &str) -> Self {
        let mut registry = Self::new();
        for (class, table) in [(JobClass::Heavy, HEAVY_JOBS), (JobClass::Light, LIGHT_JOBS)] {
            for (name, module, args) in table {
                let mut argv = vec![python_bin.to_string(), "-m".to_string(), (*module).to_string()];
                argv.extend(args.iter().map(|a| (*a).to_string()));
                registry = registry.register(name, class, argv);
            }
        }
        registry
    }

    /// Add or replace a job.
    pub fn register(mut self, name: &str, class: JobClass, argv: Vec<String>) -> Self {
        self.jobs.insert(
            name.to_string(),
            ScriptJob {
                name: name.to_string(),
                class,
                argv,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&ScriptJob> {
        self.jobs.get(name)
    }

    pub fn is_heavy(&self, name: &str) -> bool {
        self.get(name).is_some_and(|j| j.class == JobClass::Heavy)
    }

    /// All jobs, ordered by name.
    pub fn jobs(&self) -> impl Iterator<Item = &ScriptJob> {
        self.jobs.values()
    }
}
