//! # Container Arguments
//!
//! Builds the agent's command line from the primary configuration flag and
//! the flags declared on the resource.

use std::collections::HashMap;

use tracing::info;

use crate::constants::{CONFIG_ARG_DIR, RESERVED_CONFIG_ARG};

/// Assemble the container arguments
///
/// With `add_config`, `--config=/conf/<entry>` is always the first argument
/// and a declared `config` flag is discarded. Without it, a declared `config`
/// flag is kept like any other. Remaining flags are emitted as `--key=value`
/// ordered by key, independent of the map's iteration order.
#[must_use]
pub fn assemble_args(
    config_map_entry: &str,
    declared: &HashMap<String, String>,
    add_config: bool,
) -> Vec<String> {
    let mut args = Vec::with_capacity(declared.len() + 1);

    if add_config {
        if declared.contains_key(RESERVED_CONFIG_ARG) {
            info!(
                flag = RESERVED_CONFIG_ARG,
                "the 'config' flag isn't allowed and is being ignored"
            );
        }
        args.push(format!("--config={CONFIG_ARG_DIR}/{config_map_entry}"));
    }

    let mut flags: Vec<(&String, &String)> = declared
        .iter()
        .filter(|(key, _)| !(add_config && key.as_str() == RESERVED_CONFIG_ARG))
        .collect();
    flags.sort_unstable_by(|a, b| a.0.cmp(b.0));
    args.extend(flags.into_iter().map(|(k, v)| format!("--{k}={v}")));
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_flags_sorted_by_key() {
        let args = assemble_args("cwagentconfig.json", &flags(&[("b", "2"), ("a", "1")]), false);
        assert_eq!(args, vec!["--a=1", "--b=2"]);
    }

    #[test]
    fn test_key_order_not_rendered_string_order() {
        // "--a-b=2" sorts before "--a=1" as a string, but "a" < "a-b" as a key.
        let args = assemble_args("e", &flags(&[("a-b", "2"), ("a", "1")]), false);
        assert_eq!(args, vec!["--a=1", "--a-b=2"]);
    }

    #[test]
    fn test_config_flag_first_and_user_config_dropped() {
        let args = assemble_args(
            "cwagentconfig.json",
            &flags(&[("config", "/tmp/other.json"), ("mode", "ec2")]),
            true,
        );
        assert_eq!(
            args,
            vec!["--config=/conf/cwagentconfig.json", "--mode=ec2"]
        );
    }

    #[test]
    fn test_user_config_kept_without_primary_config() {
        let args = assemble_args(
            "cwagentconfig.json",
            &flags(&[("config", "/tmp/other.json")]),
            false,
        );
        assert_eq!(args, vec!["--config=/tmp/other.json"]);
    }

    #[test]
    fn test_empty_flags() {
        assert!(assemble_args("e", &HashMap::new(), false).is_empty());
        assert_eq!(assemble_args("e", &HashMap::new(), true), vec!["--config=/conf/e"]);
    }
}
