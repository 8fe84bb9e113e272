//! Property-based tests for CLI argument parsing

use super::*;
use proptest::prelude::*;

// Strategy for valid config paths
fn config_path_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_-]{0,20}\\.(yaml|yml)"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_preview_command_parses(config in config_path_strategy()) {
        let cli = parse_args(["cadencia", "preview", &config]);
        prop_assert!(cli.is_ok());
        match cli.unwrap().command {
            Command::Preview(args) => {
                prop_assert_eq!(args.config.to_str().unwrap(), &config);
            }
            _ => prop_assert!(false, "Expected Preview command"),
        }
    }

    #[test]
    fn prop_epoch_override_roundtrips(epochs in 1usize..10_000) {
        let epochs_arg = epochs.to_string();
        let cli = parse_args(["cadencia", "preview", "run.yaml", "--epochs", &epochs_arg]).unwrap();
        match cli.command {
            Command::Preview(args) => prop_assert_eq!(args.epochs, Some(epochs)),
            _ => prop_assert!(false, "Expected Preview command"),
        }
    }
}
