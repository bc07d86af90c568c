use crate::model::Model;
use anyhow::{Result, bail};
use std::sync::Arc;

/// Builds a fresh instance of a tool.
pub type Factory = Box<dyn Fn() -> Box<dyn Model> + Send + Sync>;

pub struct ToolDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    factory: Factory,
}

impl ToolDescriptor {
    pub fn new<F>(id: &'static str, name: &'static str, description: &'static str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Model> + Send + Sync + 'static,
    {
        Self {
            id,
            name,
            description,
            factory: Box::new(factory),
        }
    }

    pub fn instantiate(&self) -> Box<dyn Model> {
        (self.factory)()
    }
}

/// Collects tools at startup. Freeze it with [`RegistryBuilder::build`].
#[derive(Default)]
pub struct RegistryBuilder {
    tools: Vec<ToolDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn register(mut self, tool: ToolDescriptor) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn build(self) -> Result<Arc<Registry>> {
        for (i, tool) in self.tools.iter().enumerate() {
            if self.tools[..i].iter().any(|t| t.id == tool.id) {
                bail!("tool '{}' registered twice", tool.id);
            }
        }
        log::debug!("registered {} tools", self.tools.len());
        Ok(Arc::new(Registry { tools: self.tools }))
    }
}

/// The tools available in this process, in registration order.
pub struct Registry {
    tools: Vec<ToolDescriptor>,
}

impl Registry {
    pub fn get(&self, id: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Fresh instance of tool `id`, or `None` if no such tool exists.
    pub fn instantiate(&self, id: &str) -> Option<Box<dyn Model>> {
        self.get(id).map(ToolDescriptor::instantiate)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
