use serde::{Deserialize, Serialize};

use crate::error::ListError;

/// 链表的构造参数
///
/// `node_limit` 为空时不限制节点数量。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    pub element_size: usize,
    #[serde(default)]
    pub node_limit: Option<usize>,
}

impl ListConfig {
    pub fn new(element_size: usize) -> Self {
        ListConfig {
            element_size,
            node_limit: None,
        }
    }

    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), ListError> {
        if self.element_size == 0 {
            return Err(ListError::ZeroElementSize);
        }
        Ok(())
    }
}
