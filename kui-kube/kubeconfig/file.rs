use serde::Deserialize;

/// Subset of the kubeconfig file needed to connect to clusters.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct KubeConfigFile {
    #[serde(default)]
    pub clusters: Option<Vec<NamedCluster>>,

    #[serde(default)]
    pub users: Option<Vec<NamedUser>>,

    #[serde(default)]
    pub contexts: Option<Vec<NamedContext>>,

    #[serde(default)]
    pub current_context: Option<String>,
}

impl KubeConfigFile {
    /// Parses kubeconfig from the YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct NamedCluster {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub cluster: Option<ClusterInfo>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterInfo {
    #[serde(default)]
    pub server: Option<String>,

    #[serde(default)]
    pub certificate_authority: Option<String>,

    #[serde(default)]
    pub certificate_authority_data: Option<String>,

    #[serde(default)]
    pub insecure_skip_tls_verify: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct NamedUser {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub user: Option<UserInfo>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct UserInfo {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub client_certificate: Option<String>,

    #[serde(default)]
    pub client_certificate_data: Option<String>,

    #[serde(default)]
    pub client_key: Option<String>,

    #[serde(default)]
    pub client_key_data: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct NamedContext {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub context: Option<ContextInfo>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ContextInfo {
    #[serde(default)]
    pub cluster: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub namespace: Option<String>,
}
