//! Condition-based routing rules.
//!
//! # Responsibilities
//! - Compile ordered multi-condition matches into chained lookup tables
//! - Encode first-match-wins priority in the aggregating table
//!
//! # Design Decisions
//! - AND semantics per match: each condition's table forwards to the next
//!   condition's variable, the last yields "1"; any miss yields "0"
//! - A value's leading `!` negates it by swapping which branch succeeds
//! - The aggregating table concatenates every match's first-condition
//!   variable and dispatches on a left-anchored binary prefix (`~^1`,
//!   `~^01`, ...); the prefixes are mutually exclusive by construction, so
//!   parameter order alone encodes priority

use std::collections::HashMap;

use crate::compiler::names::{safe_variable_fragment, UpstreamNamer, VariableNamer};
use crate::compiler::params::ConfigParams;
use crate::compiler::routes::generate_location;
use crate::document::config::{InternalRedirectLocation, Location, Map, Parameter};
use crate::resources::virtual_server::{Condition, Rules, Upstream};

/// Upper bound on matches per rule-set: each match adds one alternation
/// prefix character to the aggregating table, so very large sets would grow
/// the pattern without bound. Rule-sets beyond the cap are skipped with a
/// warning by the configurator.
pub(crate) const MAX_RULE_MATCHES: usize = 64;

/// Keywords reserved by the engine's lookup-table grammar; they must be
/// escaped rather than quoted when used as a literal value.
const RESERVED_MAP_KEYWORDS: [&str; 4] = ["default", "hostnames", "include", "volatile"];

/// Everything one rules route compiles to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RulesRouteCfg {
    pub maps: Vec<Map>,
    pub locations: Vec<Location>,
    pub redirect: InternalRedirectLocation,
}

/// Compiles one rules route at the given route index.
pub(crate) fn compile_rules_route(
    path: &str,
    rules: &Rules,
    namer: &UpstreamNamer,
    upstream_catalog: &HashMap<String, Upstream>,
    variable_namer: &VariableNamer,
    index: usize,
    params: &ConfigParams,
) -> RulesRouteCfg {
    let condition_count = rules.conditions.len();
    let mut maps = Vec::with_capacity(rules.matches.len() * condition_count + 1);

    for (m, match_clause) in rules.matches.iter().enumerate() {
        for (c, condition) in rules.conditions.iter().enumerate() {
            let successful_result = if c == condition_count - 1 {
                "1".to_string()
            } else {
                variable_namer.rules_map_variable(index, m, c + 1)
            };
            // Value alignment is a caller contract; a short value list
            // degrades to the empty string rather than a panic.
            let value = match_clause.values.get(c).map(String::as_str).unwrap_or("");
            maps.push(Map {
                source: condition_source(condition),
                variable: variable_namer.rules_map_variable(index, m, c),
                parameters: map_parameters(value, &successful_result),
            });
        }
    }

    // The aggregating table: one bit per match, highest priority first.
    let mut source = String::new();
    let mut parameters = Vec::with_capacity(rules.matches.len() + 1);
    for m in 0..rules.matches.len() {
        source.push_str(&variable_namer.rules_map_variable(index, m, 0));
        parameters.push(Parameter {
            value: format!("~^{}1", "0".repeat(m)),
            result: format!("@rules_{}_match_{}", index, m),
        });
    }
    parameters.push(Parameter {
        value: "default".to_string(),
        result: format!("@rules_{}_default", index),
    });
    let main_variable = variable_namer.rules_main_map_variable(index);
    maps.push(Map {
        source,
        variable: main_variable.clone(),
        parameters,
    });

    let mut locations = Vec::with_capacity(rules.matches.len() + 1);
    for (m, match_clause) in rules.matches.iter().enumerate() {
        let location_path = format!("@rules_{}_match_{}", index, m);
        let upstream_name = namer.name_for(&match_clause.upstream);
        let upstream = upstream_catalog.get(&upstream_name).cloned().unwrap_or_default();
        locations.push(generate_location(&location_path, &upstream_name, &upstream, params));
    }
    let default_path = format!("@rules_{}_default", index);
    let default_name = namer.name_for(&rules.default_upstream);
    let default_upstream = upstream_catalog.get(&default_name).cloned().unwrap_or_default();
    locations.push(generate_location(&default_path, &default_name, &default_upstream, params));

    RulesRouteCfg {
        maps,
        locations,
        redirect: InternalRedirectLocation {
            path: path.to_string(),
            destination: main_variable,
        },
    }
}

/// Variable a condition reads its value from.
pub(crate) fn condition_source(condition: &Condition) -> String {
    match condition {
        Condition::Header(name) => format!("$http_{}", safe_variable_fragment(name)),
        Condition::Cookie(name) => format!("$cookie_{}", name),
        Condition::Argument(name) => format!("$arg_{}", name),
        Condition::Variable(name) => name.clone(),
    }
}

/// Escapes a match value for use in a lookup table and reports whether it
/// carried the leading negation marker.
pub(crate) fn map_value(raw: &str) -> (String, bool) {
    let (value, negated) = match raw.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (raw, false),
    };
    let escaped = if RESERVED_MAP_KEYWORDS.contains(&value) {
        format!("\\{}", value)
    } else {
        format!("\"{}\"", value)
    };
    (escaped, negated)
}

/// The two parameters of one condition table. Negation swaps which branch
/// is deemed successful.
pub(crate) fn map_parameters(matched_value: &str, successful_result: &str) -> Vec<Parameter> {
    let (value, negated) = map_value(matched_value);
    let (on_match, on_default) = if negated {
        ("0".to_string(), successful_result.to_string())
    } else {
        (successful_result.to_string(), "0".to_string())
    };
    vec![
        Parameter {
            value,
            result: on_match,
        },
        Parameter {
            value: "default".to_string(),
            result: on_default,
        },
    ]
}
