use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope of an issuer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssuerKind {
    /// Namespaced issuer; its keypair lives in its own namespace
    Issuer,
    /// Cluster-scoped issuer; its keypair lives in the cluster resource namespace
    ClusterIssuer,
}

impl IssuerKind {
    /// Returns the resource kind name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Issuer => "Issuer",
            Self::ClusterIssuer => "ClusterIssuer",
        }
    }
}

impl fmt::Display for IssuerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a CA-backed issuer and the secret holding its signing keypair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerRef {
    /// Namespaced or cluster-scoped
    pub kind: IssuerKind,
    /// Issuer name
    pub name: String,
    /// Issuer namespace (empty for cluster-scoped issuers)
    #[serde(default)]
    pub namespace: String,
    /// Name of the secret holding `tls.crt` and `tls.key`
    pub secret_name: String,
    /// Resource generation, bumped whenever the issuer configuration changes
    #[serde(default)]
    pub generation: i64,
}

impl IssuerRef {
    /// Reference a namespaced issuer
    pub fn issuer(
        namespace: impl Into<String>,
        name: impl Into<String>,
        secret_name: impl Into<String>,
    ) -> Self {
        Self {
            kind: IssuerKind::Issuer,
            name: name.into(),
            namespace: namespace.into(),
            secret_name: secret_name.into(),
            generation: 0,
        }
    }

    /// Reference a cluster-scoped issuer
    pub fn cluster_issuer(name: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self {
            kind: IssuerKind::ClusterIssuer,
            name: name.into(),
            namespace: String::new(),
            secret_name: secret_name.into(),
            generation: 0,
        }
    }

    /// Set the resource generation
    #[must_use]
    pub fn with_generation(mut self, generation: i64) -> Self {
        self.generation = generation;
        self
    }

    /// Identity of the issuer resource, independent of generation and secret
    #[must_use]
    pub fn key(&self) -> IssuerKey {
        IssuerKey {
            kind: self.kind,
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }
}

/// Identity of an issuer resource, used to key stored status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuerKey {
    /// Namespaced or cluster-scoped
    pub kind: IssuerKind,
    /// Namespace (empty for cluster-scoped issuers)
    pub namespace: String,
    /// Issuer name
    pub name: String,
}

impl fmt::Display for IssuerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}/{}", self.kind, self.name)
        } else {
            write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_generation_and_secret() {
        let a = IssuerRef::issuer("ns1", "ca", "ca-secret").with_generation(1);
        let b = IssuerRef::issuer("ns1", "ca", "other-secret").with_generation(7);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn key_display() {
        let ns = IssuerRef::issuer("ns1", "ca", "ca-secret");
        let cluster = IssuerRef::cluster_issuer("root", "root-secret");
        assert_eq!(ns.key().to_string(), "Issuer/ns1/ca");
        assert_eq!(cluster.key().to_string(), "ClusterIssuer/root");
    }
}
