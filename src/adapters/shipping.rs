use crate::core::{ShippingMethod, ShippingMethodLookup};
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct StaticShippingMethods {
    methods: HashMap<u64, ShippingMethod>,
}

impl StaticShippingMethods {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u64, S)>,
        S: Into<String>,
    {
        let methods = pairs
            .into_iter()
            .map(|(id, kind)| {
                (
                    id,
                    ShippingMethod {
                        id,
                        r#type: kind.into(),
                    },
                )
            })
            .collect();
        Self { methods }
    }

    /// TOML 的 table key 一定是字串，這裡轉回數字 id
    pub fn from_config(table: &HashMap<String, String>) -> Result<Self> {
        let mut pairs = Vec::with_capacity(table.len());
        for (key, kind) in table {
            let id = key
                .trim()
                .parse::<u64>()
                .map_err(|_| DispatchError::InvalidConfigValueError {
                    field: "shipping_methods".to_string(),
                    value: key.clone(),
                    reason: "Shipping method id must be a number".to_string(),
                })?;
            pairs.push((id, kind.clone()));
        }
        Ok(Self::from_pairs(pairs))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[async_trait]
impl ShippingMethodLookup for StaticShippingMethods {
    async fn find(&self, shipping_method_id: u64) -> Result<Option<ShippingMethod>> {
        Ok(self.methods.get(&shipping_method_id).cloned())
    }
}
