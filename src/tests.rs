#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use crate::error::RunlogError;
    use crate::kubernetes::{self, ClusterCommand};
    use crate::types::{CorrelationKey, PodDescriptor, RetryBudget, RunRecord};
    use crate::utils;
    use clap::Parser;

    fn record(run_id: &str) -> RunRecord {
        RunRecord {
            job_name: "app".to_string(),
            namespace: "ns".to_string(),
            run_id: run_id.to_string(),
        }
    }

    #[test]
    fn test_cli_parsing_logs_defaults() {
        let args = vec!["runlog", "logs"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(
            cli.command,
            Command::Logs {
                since: "1m".to_string(),
                retries: 5,
                kubetail: "kubetail".to_string(),
            }
        );
        assert_eq!(cli.kubectl, "kubectl");
        assert!(cli.namespace.is_none());
    }

    #[test]
    fn test_cli_parsing_logs_options() {
        let args = vec!["runlog", "logs", "--since", "10m", "--retries", "20"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Logs { since, retries, .. } = cli.command else {
            panic!("expected logs command");
        };
        assert_eq!(since, "10m");
        assert_eq!(retries, 20);
    }

    #[test]
    fn test_cli_parsing_events_watch() {
        let args = vec!["runlog", "events", "-w"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.command, Command::Events { watch: true });
    }

    #[test]
    fn test_cli_parsing_global_flags() {
        let args = vec!["runlog", "events", "-n", "team-a", "-C", "/tmp/app", "-v"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.namespace, Some("team-a".to_string()));
        assert_eq!(cli.app_dir, std::path::PathBuf::from("/tmp/app"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parsing_rejects_bad_retries() {
        let args = vec!["runlog", "logs", "--retries", "many"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_correlation_key() {
        for (run_id, expected) in [
            ("11111111-2222-3333-4444-555555555555", "app-11111111-2222"),
            ("a-b", "app-a-b"),
            ("a-", "app-a-"),
        ] {
            let key = CorrelationKey::from_record(&record(run_id));
            assert_eq!(key.as_str(), expected);
            assert_eq!(key, CorrelationKey::from_record(&record(run_id)));
        }
    }

    #[test]
    fn test_correlation_key_matching() {
        let key = CorrelationKey::from_record(&record("1111-2222-3333"));
        assert!(key.matches("app-1111-2222-worker1   1/1   Running"));
        assert!(key.matches("pod/app-1111-2222-ps-0"));
        assert!(!key.matches("App-1111-2222-worker1"));
        assert!(!key.matches("app-1111-3333-worker1"));
    }

    #[test]
    fn test_retry_budget() {
        let mut budget = RetryBudget::new(2);
        assert!(!budget.is_exhausted());
        assert_eq!(budget.record_attempt(), 1);
        assert_eq!(budget.record_attempt(), 2);
        assert!(budget.is_exhausted());
        assert_eq!(budget.record_attempt(), 2);
        assert_eq!(budget.max_attempts(), 2);
        assert!(RetryBudget::new(0).is_exhausted());
    }

    #[test]
    fn test_pod_descriptor_from_row() {
        let pod = PodDescriptor::from_row("app-1111-2222-worker1 1/1 Running 0 1d").unwrap();
        assert_eq!(pod.name, "app-1111-2222-worker1");
        assert!(pod.is_running());

        let short = PodDescriptor::from_row("app-1111-2222-worker1").unwrap();
        assert_eq!(short.status_phase, "Unknown");
        assert!(PodDescriptor::from_row("   ").is_none());
    }

    #[test]
    fn test_parse_pods_selects_key() {
        let key = CorrelationKey::from_record(&record("1111-2222-3333"));
        let listing = "NAME                    READY   STATUS    RESTARTS   AGE\n\
                       app-1111-2222-ps-0      1/1     Running   0          1d\n\
                       app-9999-2222-ps-0      1/1     Running   0          1d\n\
                       app-1111-2222-worker1   0/1     Pending   0          1s\n";
        let pods = kubernetes::parse_pods(listing, &key);
        assert_eq!(pods.len(), 2);
        assert_eq!(pods[0].name, "app-1111-2222-ps-0");
        assert_eq!(pods[1].status_phase, "Pending");
    }

    #[test]
    fn test_find_pod_skips_header() {
        let listing = "NAME    READY   STATUS    RESTARTS   AGE\n\
                       app-1   1/1     Running   0          1d\n";
        assert!(kubernetes::find_pod(listing, "NAME-x").is_none());
        assert!(kubernetes::find_pod(listing, "app-1").unwrap().is_running());
    }

    #[test]
    fn test_kubectl_commands_carry_namespace() {
        let key = CorrelationKey::from_record(&record("1111-2222-3333"));
        let commands = [
            ClusterCommand::list_pods("kubectl", "ns"),
            ClusterCommand::get_pod("kubectl", "ns", "app-1111-2222-ps-0"),
            ClusterCommand::events("kubectl", "ns", true),
            ClusterCommand::kubetail("kubetail", &key, "1m", "ns"),
        ];
        for cmd in &commands {
            assert_eq!(cmd.namespace(), Some("ns"), "{:?}", cmd);
        }
        assert_eq!(
            commands[3].args,
            vec!["app-1111-2222", "--since", "1m", "--namespace", "ns"]
        );
        assert_eq!(commands[2].args.last().map(String::as_str), Some("--watch"));
    }

    #[test]
    fn test_namespace_argument_is_not_split() {
        let cmd = ClusterCommand::list_pods("kubectl", "ns; rm -rf /");
        assert_eq!(cmd.args.len(), 4);
        assert_eq!(cmd.namespace(), Some("ns; rm -rf /"));
    }

    #[test]
    fn test_is_column_header() {
        assert!(utils::is_column_header(
            "LAST SEEN   TYPE      REASON      OBJECT          MESSAGE"
        ));
        assert!(utils::is_column_header("NAME READY STATUS RESTARTS AGE"));
        assert!(!utils::is_column_header(
            "5s   Normal   Scheduled   pod/app-1   Successfully assigned"
        ));
        assert!(!utils::is_column_header(""));
    }

    #[test]
    fn test_missing_tool_name() {
        assert_eq!(
            utils::missing_tool_name("/bin/sh: kubetail: command not found"),
            Some("kubetail".to_string())
        );
        assert_eq!(utils::missing_tool_name("error: the server is unreachable"), None);
    }

    #[test]
    fn test_tool_failure_messages() {
        let missing = RunlogError::from_tool_output("/bin/sh: kubetail: command not found\n");
        assert_eq!(
            missing.to_string(),
            "Please install `kubetail`. It is a prerequisite for `runlog` to work"
        );

        let other = RunlogError::from_tool_output("Error from server (Forbidden)\n");
        assert_eq!(other.to_string(), "Exception: Error from server (Forbidden)");

        let launch = RunlogError::launch(
            "kubectl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert!(matches!(launch, RunlogError::MissingTool { ref tool } if tool == "kubectl"));
        assert_eq!(launch.exit_code(), 1);
    }
}
