use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use selrule::Config;
use selrule::io::{FileReader, InputReader, StdinReader, VecReader};
use selrule::rules::{
    FieldRuleSet, Value, evaluate_field_rule_set, evaluate_value_rule_set, matches, matches_class,
    matches_class_method, split_dot_path,
};
use selrule::services::ScanService;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "selrule",
    about = "Evaluate class/method selectors and comparison rules",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Match a candidate against a wildcard selector
    Match { selector: String, candidate: String },

    /// Match a class and method against a `Class::Method` selector
    ClassMethod {
        selector: String,
        class_name: String,
        method_name: String,
    },

    /// Match a class against the class half of a selector
    Class { selector: String, class_name: String },

    /// Evaluate field rules against `name=value` fields
    Field {
        /// Field value, as `name=value` (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// Raw pattern the field must fully match, as `name=pattern` (repeatable)
        #[arg(long = "named", value_name = "NAME=PATTERN")]
        named: Vec<String>,

        /// File with one rule per line
        #[arg(short = 'f', long = "file")]
        rules_file: Option<String>,

        rules: Vec<String>,
    },

    /// Evaluate value rules against a single value
    Value {
        #[arg(long = "value")]
        value: String,

        /// Interpret the value as a number or bool when it looks like one
        #[arg(long = "typed")]
        typed: bool,

        rules: Vec<String>,
    },

    /// Split a dotted path, honoring `\.` escapes
    Split { path: String },

    /// Find classes under a source root matching selectors
    Scan {
        /// Source root (falls back to SELRULE_ROOT)
        #[arg(long = "root")]
        root: Option<String>,

        /// Namespace of the source root (falls back to SELRULE_NAMESPACE)
        #[arg(long = "namespace")]
        namespace: Option<String>,

        /// File extension to scan, `*` for all (falls back to SELRULE_EXTENSION)
        #[arg(long = "ext")]
        extension: Option<String>,

        /// File with one selector per line (reads stdin if no selectors are given)
        #[arg(short = 'f', long = "file")]
        selectors_file: Option<String>,

        /// Disable progress output
        #[arg(short = 'q', long = "quiet")]
        quiet: bool,

        selectors: Vec<String>,
    },
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => bail!("Expected NAME=VALUE, got '{}'", pair),
    }
}

async fn field_command(
    fields: &[String],
    named: &[String],
    rules_file: Option<&str>,
    rules: &[String],
) -> Result<bool> {
    let values = fields
        .iter()
        .map(|pair| split_pair(pair).map(|(k, v)| (k.to_string(), Value::parse_literal(v))))
        .collect::<Result<HashMap<_, _>>>()?;

    let file_rules = match rules_file {
        Some(path) => FileReader::new(path).read_lines().await?,
        None => Vec::new(),
    };

    // rules given as arguments are taken verbatim
    let mut set = rules
        .iter()
        .fold(FieldRuleSet::from(file_rules), |set, rule| set.rule(rule.as_str()));
    for pair in named {
        let (name, pattern) = split_pair(pair)?;
        set = set.named(name, pattern);
    }

    let satisfied = evaluate_field_rule_set(&set, |name: &str| values.get(name).cloned())
        .context("Failed to evaluate field rules")?;
    Ok(satisfied)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let outcome = match args.command {
        Command::Match {
            selector,
            candidate,
        } => matches(&selector, &candidate)?,
        Command::ClassMethod {
            selector,
            class_name,
            method_name,
        } => matches_class_method(&selector, &class_name, &method_name)?,
        Command::Class {
            selector,
            class_name,
        } => matches_class(&selector, &class_name)?,
        Command::Field {
            fields,
            named,
            rules_file,
            rules,
        } => field_command(&fields, &named, rules_file.as_deref(), &rules).await?,
        Command::Value {
            value,
            typed,
            rules,
        } => {
            let value = if typed {
                Value::parse_literal(&value)
            } else {
                Value::String(value)
            };
            evaluate_value_rule_set(&rules, &value)
        }
        Command::Split { path } => {
            for segment in split_dot_path(&path) {
                println!("{}", segment);
            }
            return Ok(());
        }
        Command::Scan {
            root,
            namespace,
            extension,
            selectors_file,
            quiet,
            selectors,
        } => {
            let config = Config::builder()
                .root(root.as_deref(), true)
                .namespace(namespace.as_deref(), true)
                .extension(extension.as_deref(), true)
                .show_progress(!quiet)
                .build()?;

            let reader: Box<dyn InputReader> = match (&selectors_file, selectors.is_empty()) {
                (Some(file_path), _) => Box::new(FileReader::new(file_path)),
                (None, false) => Box::new(VecReader::new(selectors)),
                (None, true) => Box::new(StdinReader::new()),
            };

            let found = ScanService::new(reader, config).run().await?;
            if quiet {
                for class_match in &found {
                    println!("{}", class_match.class_name);
                }
            }
            return Ok(());
        }
    };

    println!("{}", outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_field_rule_arguments_are_not_filtered() {
        let rules = vec!["#tag".to_string()];
        assert!(!field_command(&[], &[], None, &rules).await.unwrap());

        let fields = vec!["#tag=1".to_string()];
        assert!(field_command(&fields, &[], None, &rules).await.unwrap());
    }

    #[tokio::test]
    async fn test_field_rule_file_skips_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# status must be set").unwrap();
        writeln!(file, "status=1").unwrap();
        writeln!(file).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let fields = vec!["status=1".to_string(), "id=3".to_string()];
        let rules = vec!["id!=4".to_string()];
        assert!(field_command(&fields, &[], Some(path.as_str()), &rules).await.unwrap());

        let rules = vec!["!id".to_string()];
        assert!(!field_command(&fields, &[], Some(path.as_str()), &rules).await.unwrap());
    }
}
