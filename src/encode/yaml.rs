//! Emits the YOLO `data.yaml` descriptor: split paths
//! relative to the release root, class count, and the alphabetically
//! ordered class name list `ClassMap` froze.

use serde::Serialize;

use crate::error::Result;
use super::classmap::ClassMap;

#[derive(Serialize)]
pub struct DataYaml {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    pub nc: usize,
    pub names: Vec<String>,
}

impl DataYaml {
    /// `train_count`/`val_count`/`test_count` are the number of images
    /// actually written to that split; a split with no images written
    /// is omitted from the descriptor entirely.
    pub fn new(
        release_root: impl Into<String>,
        classes: &ClassMap,
        train_count: u64,
        val_count: u64,
        test_count: u64,
    ) -> Self {
        let present = |count: u64, path: &str| if count > 0 { Some(path.to_string()) } else { None };
        Self {
            path: release_root.into(),
            train: present(train_count, "images/train"),
            val: present(val_count, "images/val"),
            test: present(test_count, "images/test"),
            nc: classes.len(),
            names: classes.names_in_order().to_vec(),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
