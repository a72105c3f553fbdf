//! Caller-supplied transform and lifecycle hooks
//!
//! A [`HookRegistry`] holds named callbacks. Resolving a transform name binds
//! that transform plus the optional `<name>_pre` and `<name>_post` lifecycle
//! hooks, which run once before and once after the record loop.
//!
//! ```
//! use record_etl::hooks::HookRegistry;
//! use record_etl::record::stringify;
//!
//! let registry = HookRegistry::new()
//!     .with_transform("pipe", |record| {
//!         let fields: Vec<String> = record.values().map(stringify).collect();
//!         Ok(format!("{}\n", fields.join("|")))
//!     })
//!     .with_lifecycle("pipe_pre", || {
//!         log::info!("starting");
//!         Ok(())
//!     });
//!
//! let hooks = registry.resolve("pipe").unwrap();
//! assert!(hooks.has_pre());
//! assert!(!hooks.has_post());
//! ```

use crate::error::EtlError;
use crate::record::{Fragment, Record};
use eyre::Result;
use std::collections::HashMap;

pub const PRE_SUFFIX: &str = "_pre";
pub const POST_SUFFIX: &str = "_post";

/// Per-record transform; its output is written verbatim
pub type TransformFn = Box<dyn FnMut(&Record) -> Result<Fragment>>;

/// Zero-argument callback run around the record loop
pub type LifecycleFn = Box<dyn FnMut() -> Result<()>>;

/// A named capability in a [`HookRegistry`]
pub enum Hook {
    Transform(TransformFn),
    Lifecycle(LifecycleFn),
}

impl Hook {
    fn kind(&self) -> &'static str {
        match self {
            Hook::Transform(_) => "transform",
            Hook::Lifecycle(_) => "lifecycle",
        }
    }
}

/// Named hooks a job may bind to
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Hook>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a per-record transform
    pub fn with_transform(
        mut self,
        name: impl Into<String>,
        transform: impl FnMut(&Record) -> Result<Fragment> + 'static,
    ) -> Self {
        self.hooks
            .insert(name.into(), Hook::Transform(Box::new(transform)));
        self
    }

    /// Register a zero-argument hook, typically `<transform>_pre` or `<transform>_post`
    pub fn with_lifecycle(
        mut self,
        name: impl Into<String>,
        hook: impl FnMut() -> Result<()> + 'static,
    ) -> Self {
        self.hooks.insert(name.into(), Hook::Lifecycle(Box::new(hook)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Bind the transform called `name` and its lifecycle siblings
    ///
    /// # Errors
    /// - [`EtlError::MethodNotFound`] if nothing is registered under `name`
    /// - [`EtlError::MethodNotCallable`] if `name` is a lifecycle hook, or a
    ///   `_pre`/`_post` sibling is a transform
    pub fn resolve(mut self, name: &str) -> Result<BoundHooks, EtlError> {
        let transform = match self.hooks.remove(name) {
            Some(Hook::Transform(transform)) => transform,
            Some(Hook::Lifecycle(_)) => {
                return Err(EtlError::MethodNotCallable(
                    name.to_string(),
                    "a record transform",
                ));
            }
            None => return Err(EtlError::MethodNotFound(name.to_string())),
        };

        let pre = self.take_lifecycle(&format!("{name}{PRE_SUFFIX}"))?;
        let post = self.take_lifecycle(&format!("{name}{POST_SUFFIX}"))?;
        log::debug!(
            "Bound hook '{}' (pre: {}, post: {})",
            name,
            pre.is_some(),
            post.is_some()
        );

        Ok(BoundHooks {
            name: name.to_string(),
            transform,
            pre,
            post,
        })
    }

    fn take_lifecycle(&mut self, name: &str) -> Result<Option<LifecycleFn>, EtlError> {
        match self.hooks.remove(name) {
            Some(Hook::Lifecycle(hook)) => Ok(Some(hook)),
            Some(other) => {
                log::debug!("'{}' is registered as a {} hook", name, other.kind());
                Err(EtlError::MethodNotCallable(
                    name.to_string(),
                    "a lifecycle hook",
                ))
            }
            None => Ok(None),
        }
    }
}

/// A resolved transform with its optional lifecycle hooks
pub struct BoundHooks {
    name: String,
    transform: TransformFn,
    pre: Option<LifecycleFn>,
    post: Option<LifecycleFn>,
}

impl BoundHooks {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_pre(&self) -> bool {
        self.pre.is_some()
    }

    pub fn has_post(&self) -> bool {
        self.post.is_some()
    }

    /// Run the `_pre` hook, if any
    pub fn before(&mut self) -> Result<()> {
        match self.pre.as_mut() {
            Some(pre) => pre(),
            None => Ok(()),
        }
    }

    pub fn transform(&mut self, record: &Record) -> Result<Fragment> {
        (self.transform)(record)
    }

    /// Run the `_post` hook, if any
    pub fn after(&mut self) -> Result<()> {
        match self.post.as_mut() {
            Some(post) => post(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for BoundHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundHooks")
            .field("name", &self.name)
            .field("pre", &self.has_pre())
            .field("post", &self.has_post())
            .finish()
    }
}
