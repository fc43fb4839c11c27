use clap::Parser;
use kui_query::QueryScope;
use rstest::rstest;

use super::*;

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("kui").chain(args.iter().copied())).unwrap()
}

#[test]
fn list_command_test() {
    let args = parse(&["list", "pods", "services", "-n", "web", "--context", "dev", "-o", "yaml"]);

    assert_eq!(Some("dev"), args.context(Some("prod")));
    assert_eq!(OutputFormat::Yaml, args.output);
    let Command::List { resources, scope } = args.command else {
        panic!("expected list command");
    };
    assert_eq!(vec!["pods", "services"], resources);
    assert_eq!(NamespaceSelection::single("web"), scope.selection(Some("kube-system")));
}

#[rstest]
#[case(&["list"], QueryScope::SingleNamespace, "team")]
#[case(&["list", "-A"], QueryScope::AllNamespaces, "")]
#[case(&["list", "--cluster"], QueryScope::ClusterObjects, "")]
fn list_scope_test(#[case] args: &[&str], #[case] scope: QueryScope, #[case] namespace: &str) {
    let Command::List { scope: args, .. } = parse(args).command else {
        panic!("expected list command");
    };

    let selection = args.selection(Some("team"));

    assert_eq!(scope, selection.scope);
    assert_eq!(namespace, selection.namespace);
}

#[test]
fn conflicting_scopes_test() {
    assert!(Args::try_parse_from(["kui", "list", "-A", "--cluster"]).is_err());
    assert!(Args::try_parse_from(["kui", "list", "-n", "web", "-A"]).is_err());
}

#[test]
fn get_command_test() {
    let args = parse(&["get", "deployments", "web"]);

    assert_eq!(
        Command::Get {
            resource: "deployments".to_owned(),
            name: "web".to_owned(),
            namespace: None
        },
        args.command
    );
    assert_eq!(OutputFormat::Json, args.output);
    assert_eq!(Some("prod"), args.context(Some("prod")));
}

#[test]
fn client_options_test() {
    let config = Config {
        allow_insecure: false,
        impersonate: Some(Impersonation {
            user: Some("viewer".to_owned()),
            groups: vec!["readers".to_owned()],
        }),
        discovery_concurrency: 0,
        ..Default::default()
    };

    let options = parse(&["contexts"]).client_options(&config);
    assert_eq!(Some("viewer"), options.impersonate_user.as_deref());
    assert_eq!(vec!["readers"], options.impersonate_groups);
    assert_eq!(1, options.discovery_concurrency);
    assert!(!options.allow_insecure);

    let options = parse(&["contexts", "--insecure", "--as", "admin"]).client_options(&config);
    assert_eq!(Some("admin"), options.impersonate_user.as_deref());
    assert!(options.impersonate_groups.is_empty());
    assert!(options.allow_insecure);
}

#[rstest]
#[case(Some("web"), Some("team"), "web")]
#[case(None, Some("team"), "team")]
#[case(Some(""), None, "default")]
fn namespace_or_default_test(#[case] namespace: Option<&str>, #[case] default: Option<&str>, #[case] expected: &str) {
    assert_eq!(expected, namespace_or_default(namespace, default));
}
