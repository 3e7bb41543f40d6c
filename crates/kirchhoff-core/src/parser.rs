//! TOML template catalog parser.
//!
//! Loads catalogs (one objective plus its templates) from TOML files and
//! directories, and validates them.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    Catalog, Objective, ParamConstraint, ParameterKind, ParameterSchema, ProblemTemplate,
    SolutionSpec,
};
use crate::render::placeholders;
use crate::sampler::integer_bounds;
use crate::solver::SolverRegistry;
use crate::units::unit_matches;

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    objective: TomlObjective,
    #[serde(default)]
    templates: Vec<TomlTemplate>,
}

#[derive(Debug, Deserialize)]
struct TomlObjective {
    #[serde(default)]
    id: Option<String>,
    code: String,
    #[serde(default)]
    statement: String,
}

#[derive(Debug, Deserialize)]
struct TomlTemplate {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    prompt_template: String,
    #[serde(default)]
    answer_units: String,
    /// Defaults to every declared parameter.
    #[serde(default)]
    required: Option<Vec<String>>,
    #[serde(default)]
    params: BTreeMap<String, ParamConstraint>,
    #[serde(default)]
    solution: Option<SolutionSpec>,
}

fn default_difficulty() -> u8 {
    1
}

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let objective = Objective {
        id: parsed
            .objective
            .id
            .unwrap_or_else(|| parsed.objective.code.clone()),
        code: parsed.objective.code,
        statement: parsed.objective.statement,
    };

    let templates = parsed
        .templates
        .into_iter()
        .map(|t| {
            let required = t
                .required
                .unwrap_or_else(|| t.params.keys().cloned().collect());
            let solution_spec = t.solution.unwrap_or_else(|| SolutionSpec {
                unit: if t.answer_units.is_empty() {
                    SolutionSpec::default().unit
                } else {
                    t.answer_units.clone()
                },
                ..SolutionSpec::default()
            });

            ProblemTemplate {
                id: t.id,
                objective_id: objective.id.clone(),
                title: t.title,
                difficulty: t.difficulty,
                params_schema: ParameterSchema {
                    properties: t.params,
                    required,
                },
                prompt_template: t.prompt_template,
                answer_units: t.answer_units,
                solution_spec,
            }
        })
        .collect();

    Ok(Catalog {
        objective,
        templates,
    })
}

/// Recursively load all `.toml` catalog files from a directory.
pub fn load_catalog_dir(dir: &Path) -> Result<Vec<Catalog>> {
    let mut catalogs = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            catalogs.extend(load_catalog_dir(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(catalog) => catalogs.push(catalog),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(catalogs)
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The template ID (if applicable).
    pub template_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn template(id: &str, message: impl Into<String>) -> Self {
        Self {
            template_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a catalog for issues that would make generation or grading fail
/// or produce a confusing prompt.
pub fn validate_catalog(catalog: &Catalog, solvers: &SolverRegistry) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if catalog.templates.is_empty() {
        warnings.push(ValidationWarning {
            template_id: None,
            message: format!("objective {} has no templates", catalog.objective.code),
        });
    }

    let mut seen_ids = HashSet::new();
    for template in &catalog.templates {
        if !seen_ids.insert(&template.id) {
            warnings.push(ValidationWarning::template(
                &template.id,
                format!("duplicate template ID: {}", template.id),
            ));
        }
    }

    for template in &catalog.templates {
        warnings.extend(validate_template(template, solvers));
    }

    warnings
}

fn validate_template(template: &ProblemTemplate, solvers: &SolverRegistry) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let id = template.id.as_str();
    let schema = &template.params_schema;

    if template.prompt_template.trim().is_empty() {
        warnings.push(ValidationWarning::template(id, "prompt is empty"));
    }

    for name in &schema.required {
        let Some(constraint) = schema.properties.get(name) else {
            warnings.push(ValidationWarning::template(
                id,
                format!("required parameter `{name}` has no constraint"),
            ));
            continue;
        };
        match constraint.kind_for(name) {
            ParameterKind::Quantity => {
                if let Err(e) = integer_bounds(name, constraint) {
                    warnings.push(ValidationWarning::template(id, e.to_string()));
                }
            }
            ParameterKind::Component => {
                if constraint.catalog().is_empty() {
                    warnings.push(ValidationWarning::template(
                        id,
                        format!("parameter `{name}` has an empty catalog"),
                    ));
                }
            }
        }
    }

    let tokens: HashSet<&str> = placeholders(&template.prompt_template).into_iter().collect();
    let mut unmatched: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !schema.required.iter().any(|r| r == t))
        .collect();
    unmatched.sort_unstable();
    for token in unmatched {
        warnings.push(ValidationWarning::template(
            id,
            format!("placeholder {{{{{token}}}}} has no required parameter and will not be replaced"),
        ));
    }

    for name in &schema.required {
        if !tokens.contains(name.as_str()) {
            warnings.push(ValidationWarning::template(
                id,
                format!("parameter `{name}` never appears in the prompt"),
            ));
        }
    }

    match solvers.unit(&template.solution_spec.family) {
        None => warnings.push(ValidationWarning::template(
            id,
            format!("unknown solver family: {}", template.solution_spec.family),
        )),
        Some(unit) if !unit_matches(&template.solution_spec.unit, unit) => {
            warnings.push(ValidationWarning::template(
                id,
                format!(
                    "solver family `{}` answers in `{unit}`, not solution unit `{}`",
                    template.solution_spec.family, template.solution_spec.unit
                ),
            ))
        }
        Some(_) => {}
    }

    if !template.answer_units.is_empty()
        && !unit_matches(&template.answer_units, &template.solution_spec.unit)
    {
        warnings.push(ValidationWarning::template(
            id,
            format!(
                "answer_units `{}` does not match solution unit `{}`",
                template.answer_units, template.solution_spec.unit
            ),
        ));
    }

    warnings
}
