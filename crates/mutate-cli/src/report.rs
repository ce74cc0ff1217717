use forge_mutate::{Mutation, SourceFile};
use itertools::Itertools;
use serde::Serialize;
use std::{collections::BTreeMap, fmt::Write};
use yansi::Paint;

/// A mutation together with the function it lands in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationReport<'a> {
    #[serde(flatten)]
    pub mutation: &'a Mutation,
    pub enclosing_function: Option<&'a str>,
}

/// Everything a run produced.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// Number of mutations per operator id.
    pub summary: BTreeMap<&'a str, usize>,
    pub mutations: Vec<MutationReport<'a>>,
}

impl<'a> RunReport<'a> {
    pub fn new(files: &'a [SourceFile], mutations: &'a [Mutation]) -> Self {
        let mut summary = BTreeMap::new();
        let mutations = mutations
            .iter()
            .map(|mutation| {
                *summary.entry(mutation.operator_id()).or_default() += 1;
                let enclosing_function = files
                    .iter()
                    .find(|file| file.path() == mutation.file())
                    .and_then(|file| file.enclosing_function(mutation));
                MutationReport { mutation, enclosing_function }
            })
            .collect();
        Self { summary, mutations }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One line per mutation, optionally followed by its diff, then a summary line.
    pub fn to_text(&self, diff: bool) -> String {
        let mut out = String::new();
        for report in &self.mutations {
            let mutation = report.mutation;
            let _ = write!(
                out,
                "{} {}:{}",
                format!("[{}]", mutation.operator_id()).yellow().bold(),
                mutation.relative_path(),
                mutation.lines().0,
            );
            if let Some(function) = report.enclosing_function {
                let _ = write!(out, " in {}", function.cyan());
            }
            let _ = writeln!(out, ": {}", mutation.short_description());

            if diff {
                for line in mutation.format_diff().lines() {
                    let line = if line.starts_with('-') { line.red() } else { line.green() };
                    let _ = writeln!(out, "    {line}");
                }
            }
        }

        let _ = write!(out, "{} mutations", self.mutations.len());
        if !self.summary.is_empty() {
            let per_operator = self.summary.iter().map(|(id, n)| format!("{id}: {n}")).join(", ");
            let _ = write!(out, " ({per_operator})");
        }
        out.push('\n');
        out
    }
}
