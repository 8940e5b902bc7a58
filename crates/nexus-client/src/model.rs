use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPage {
    #[serde(default)]
    pub items: Vec<Component>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Component {
    /// `group/name` for composer components, plain `name` otherwise.
    pub fn full_name(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        match self.group.as_deref() {
            Some(group) if !group.is_empty() && !name.starts_with(&format!("{group}/")) => {
                Some(format!("{group}/{name}"))
            }
            _ => Some(name.to_string()),
        }
    }

    pub fn label(&self) -> String {
        match (self.full_name(), self.version.as_deref()) {
            (Some(name), Some(version)) => format!("{name} {version}"),
            (Some(name), None) => name,
            _ => self.id.clone(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub path: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl Asset {
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}
