//! inputs owned by the surrounding controller
use serde::Deserialize;

/// The Infrastructure resource being reconciled
#[derive(derive_new::new, Debug, Clone, PartialEq)]
pub struct Infrastructure {
    /// Namespace of the shoot cluster in the seed, also used to scope resource names
    pub namespace: String,
    pub region: String,
}

/// Cluster facts relevant for network layout
#[derive(derive_new::new, Debug, Clone, Default, PartialEq)]
pub struct Cluster {
    pods: Option<String>,
    services: Option<String>,
}

impl Cluster {
    pub fn pod_network(&self) -> Option<&str> {
        self.pods.as_deref()
    }

    pub fn service_network(&self) -> Option<&str> {
        self.services.as_deref()
    }
}

/// GCP service account credentials
#[derive(derive_new::new, Debug, Clone, PartialEq)]
pub struct ServiceAccount {
    pub project_id: String,
    pub email: String,
    /// The service account JSON as it was read
    #[new(default)]
    pub raw: Vec<u8>,
}

impl ServiceAccount {
    /// Reads the `project_id` and `client_email` of a service account JSON key
    pub fn from_json(data: &[u8]) -> Result<Self, ServiceAccountError> {
        #[derive(Deserialize)]
        struct Credentials {
            #[serde(default)]
            project_id: String,
            #[serde(default)]
            client_email: String,
        }

        let credentials: Credentials = serde_json::from_slice(data)?;
        if credentials.project_id.is_empty() {
            return Err(ServiceAccountError::MissingProjectId);
        }

        Ok(Self {
            project_id: credentials.project_id,
            email: credentials.client_email,
            raw: data.to_vec(),
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ServiceAccountError {
    #[error("Unable to parse service account JSON")]
    Json(#[from] serde_json::Error),
    #[error("Service account JSON has no project_id")]
    MissingProjectId,
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn service_account_from_json() {
        let data = br#"{"type":"service_account","project_id":"my-project","client_email":"sa@my-project.iam.gserviceaccount.com"}"#;
        let account = ServiceAccount::from_json(data).unwrap();

        assert_eq!(account.project_id, "my-project");
        assert_eq!(account.email, "sa@my-project.iam.gserviceaccount.com");
        assert_eq!(account.raw, data.to_vec());
    }

    #[test]
    fn service_account_without_project() {
        assert!(matches!(
            ServiceAccount::from_json(br#"{"client_email":"sa@example.com"}"#),
            Err(ServiceAccountError::MissingProjectId)
        ));
        assert!(matches!(
            ServiceAccount::from_json(b"not json"),
            Err(ServiceAccountError::Json(_))
        ));
    }

    #[test]
    fn cluster_networks() {
        let cluster = Cluster::new(Some("100.96.0.0/11".into()), None);
        assert_eq!(cluster.pod_network(), Some("100.96.0.0/11"));
        assert_eq!(cluster.service_network(), None);
    }
}
