use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TaskError;

pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

pub struct Client {
    endpoint: String,
    agent: ureq::Agent,
}

impl Client {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(25))
                .user_agent("overpass-pull")
                .build(),
        }
    }

    /// One query, one request, no retries. The caller decides what a failure
    /// means for the rest of the run.
    pub fn execute(&self, query: &str) -> Result<FeatureCollection, TaskError> {
        let response = self.agent.post(&self.endpoint).send_form(&[("data", query)])?;
        let collection = serde_json::from_reader(response.into_reader())?;

        Ok(collection)
    }
}

#[derive(Deserialize, Serialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    // geojson "type", osm3s metadata and whatever else the service sends
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Deserialize, Serialize)]
pub struct Feature {
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl FeatureCollection {
    /// Copies every key of each feature's `properties.tags` object up into
    /// `properties` itself. Tag values win on collision, and `tags` stays in
    /// place, so flattening twice lands on the same state.
    pub fn flatten(&mut self) -> Result<(), TaskError> {
        for (i, feature) in self.features.iter_mut().enumerate() {
            let tags = match feature.properties.get("tags") {
                Some(Value::Object(tags)) => tags.clone(),
                _ => return Err(TaskError::MalformedFeature(i)),
            };
            for (key, value) in tags {
                feature.properties.insert(key, value);
            }
        }

        Ok(())
    }

    pub fn write(&self, path: &Path) -> Result<(), TaskError> {
        fs::write(path, serde_json::to_string(self)?)?;

        Ok(())
    }
}
