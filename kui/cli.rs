use clap::{Parser, Subcommand, ValueEnum};
use kui_config::{Config, Impersonation};
use kui_kube::ClientOptions;
use kui_query::NamespaceSelection;

#[cfg(test)]
#[path = "./cli.tests.rs"]
mod cli_tests;

/// kui browses Kubernetes clusters defined in the kubeconfig files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Kubeconfig files separated by the platform path separator (defaults to $HOME/.kube/config).
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kube_config: Option<String>,

    /// Context to use from the kubeconfig files.
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Skip TLS certificate verification (insecure).
    #[arg(long, global = true)]
    pub insecure: bool,

    /// User to impersonate.
    #[arg(long = "as", global = true)]
    pub impersonate_user: Option<String>,

    /// Group to impersonate, can be repeated.
    #[arg(long = "as-group", global = true)]
    pub impersonate_groups: Vec<String>,

    /// Output format.
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Lists contexts from the kubeconfig files.
    Contexts,

    /// Shows resources served by the context's cluster.
    Describe,

    /// Lists resources, all resources in scope if none is given.
    List {
        resources: Vec<String>,

        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Shows one object together with its events (and pods for replica sets).
    Get {
        resource: String,
        name: String,

        /// Namespace of the object, context default is used if not set.
        #[arg(long, short)]
        namespace: Option<String>,
    },
}

/// Namespace scope of the listed resources.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct ScopeArgs {
    /// Namespace to list resources in, context default is used if not set.
    #[arg(long, short, conflicts_with_all = ["all_namespaces", "cluster"])]
    pub namespace: Option<String>,

    /// List namespaced resources across all namespaces.
    #[arg(long, short = 'A', conflicts_with = "cluster")]
    pub all_namespaces: bool,

    /// List cluster scoped resources.
    #[arg(long)]
    pub cluster: bool,
}

impl ScopeArgs {
    /// Returns namespace selection respecting `--all-namespaces` and `--cluster` switches.
    pub fn selection(&self, default: Option<&str>) -> NamespaceSelection {
        if self.cluster {
            NamespaceSelection::cluster()
        } else if self.all_namespaces {
            NamespaceSelection::all()
        } else {
            NamespaceSelection::single(namespace_or_default(self.namespace.as_deref(), default))
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl Args {
    /// Returns client options from the command line merged with the configuration.
    pub fn client_options(&self, config: &Config) -> ClientOptions {
        let impersonate = config.impersonate.clone().unwrap_or_default();
        let impersonate = if self.impersonate_user.is_some() || !self.impersonate_groups.is_empty() {
            Impersonation {
                user: self.impersonate_user.clone(),
                groups: self.impersonate_groups.clone(),
            }
        } else {
            impersonate
        };

        ClientOptions {
            allow_insecure: self.insecure || config.allow_insecure,
            impersonate_user: impersonate.user.filter(|u| !u.is_empty()),
            impersonate_groups: impersonate.groups,
            discovery_concurrency: config.discovery_concurrency(),
        }
    }

    /// Returns context or default if context is `None`.
    pub fn context<'a>(&'a self, default: Option<&'a str>) -> Option<&'a str> {
        self.context.as_deref().filter(|c| !c.is_empty()).or(default)
    }
}

/// Returns `namespace`, the context `default` one, or `default` namespace if neither is set.
pub fn namespace_or_default(namespace: Option<&str>, default: Option<&str>) -> String {
    namespace
        .filter(|n| !n.is_empty())
        .or(default.filter(|n| !n.is_empty()))
        .unwrap_or("default")
        .to_owned()
}
