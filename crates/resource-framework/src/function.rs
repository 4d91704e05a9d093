//! # Business Functions
//!
//! Application logic is written once, as a [`BusinessFunction`], and registered
//! under a name in a [`FunctionRegistry`]. Front-ends (a network server, a
//! shell, a scheduled job) look functions up by name, read their declared
//! parameters from [`FunctionRegistry::signatures`], and call
//! [`FunctionRegistry::invoke`]. A function cannot tell which front-end called
//! it: it only ever sees its [`Arguments`].
//!
//! ```rust
//! use resource_framework::function::{from_fn, FunctionRegistry};
//! use resource_framework::{record, Value};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let functions = FunctionRegistry::new();
//! functions
//!     .register("greet", from_fn(&["name"], |args| async move {
//!         let name = args.get("name").cloned().unwrap_or_default();
//!         Ok(Value::from(format!("hello {}", name.as_str().unwrap_or("?"))))
//!     }))
//!     .unwrap();
//!
//! let out = functions.invoke("greet", record! { "name" => "ann" }).await.unwrap();
//! assert_eq!(out, Value::from("hello ann"));
//! # }
//! ```

use crate::error::FunctionError;
use crate::value::{Record, Value};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, instrument, warn};

/// Named argument values passed to a function.
pub type Arguments = Record;

#[async_trait]
pub trait BusinessFunction: Send + Sync {
    /// Declared parameter names. Every one must be supplied, and nothing else.
    fn params(&self) -> &[&'static str];

    async fn call(&self, args: Arguments) -> Result<Value, FunctionError>;
}

/// A [`BusinessFunction`] backed by an async closure.
pub struct FnFunction<F> {
    params: &'static [&'static str],
    f: F,
}

/// Wraps an async closure as a [`BusinessFunction`].
pub fn from_fn<F, Fut>(params: &'static [&'static str], f: F) -> FnFunction<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, FunctionError>> + Send + 'static,
{
    FnFunction { params, f }
}

#[async_trait]
impl<F, Fut> BusinessFunction for FnFunction<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, FunctionError>> + Send + 'static,
{
    fn params(&self) -> &[&'static str] {
        self.params
    }

    async fn call(&self, args: Arguments) -> Result<Value, FunctionError> {
        (self.f)(args).await
    }
}

/// What a front-end needs to expose a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub name: String,
    pub params: Vec<String>,
}

#[derive(Default)]
pub struct FunctionRegistry {
    functions: RwLock<HashMap<String, Arc<dyn BusinessFunction>>>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.signatures())
            .finish()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        name: impl Into<String>,
        function: impl BusinessFunction + 'static,
    ) -> Result<(), FunctionError> {
        let name = name.into();
        let mut functions = self.functions.write().unwrap_or_else(PoisonError::into_inner);
        if functions.contains_key(&name) {
            return Err(FunctionError::DuplicateFunction(name));
        }
        info!(function = %name, params = ?function.params(), "Registered function");
        functions.insert(name, Arc::new(function));
        Ok(())
    }

    /// Checks the arguments against the declared parameters, then calls.
    #[instrument(skip(self, args))]
    pub async fn invoke(&self, name: &str, args: Arguments) -> Result<Value, FunctionError> {
        let function = self
            .functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| FunctionError::UnknownFunction(name.to_string()))?;

        let params = function.params();
        if let Some(missing) = params.iter().find(|p| !args.contains_key(**p)) {
            return Err(FunctionError::MissingArgument {
                function: name.to_string(),
                param: missing.to_string(),
            });
        }
        if let Some(extra) = args.keys().find(|k| !params.iter().any(|p| *p == k.as_str())) {
            return Err(FunctionError::UnexpectedArgument {
                function: name.to_string(),
                param: extra.clone(),
            });
        }

        function.call(args).await.inspect_err(|e| {
            warn!(error = %e, "Function failed");
        })
    }

    /// Registered functions with their parameters, sorted by name.
    pub fn signatures(&self) -> Vec<Signature> {
        let functions = self.functions.read().unwrap_or_else(PoisonError::into_inner);
        let mut signatures: Vec<Signature> = functions
            .iter()
            .map(|(name, f)| Signature {
                name: name.clone(),
                params: f.params().iter().map(|p| p.to_string()).collect(),
            })
            .collect();
        signatures.sort_by(|a, b| a.name.cmp(&b.name));
        signatures
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    fn add() -> FnFunction<impl Fn(Arguments) -> std::future::Ready<Result<Value, FunctionError>>> {
        from_fn(&["a", "b"], |args: Arguments| {
            let sum = args["a"].as_i64().unwrap_or(0) + args["b"].as_i64().unwrap_or(0);
            std::future::ready(Ok(Value::Int(sum)))
        })
    }

    #[tokio::test]
    async fn test_invoke_checks_arguments() {
        let functions = FunctionRegistry::new();
        functions.register("add", add()).unwrap();

        assert_eq!(
            functions.invoke("add", record! { "a" => 2, "b" => 3 }).await.unwrap(),
            Value::Int(5)
        );
        assert!(matches!(
            functions.invoke("add", record! { "a" => 2 }).await,
            Err(FunctionError::MissingArgument { param, .. }) if param == "b"
        ));
        assert!(matches!(
            functions.invoke("add", record! { "a" => 2, "b" => 3, "c" => 4 }).await,
            Err(FunctionError::UnexpectedArgument { param, .. }) if param == "c"
        ));
        assert!(matches!(
            functions.invoke("sub", Arguments::new()).await,
            Err(FunctionError::UnknownFunction(name)) if name == "sub"
        ));
    }

    #[test]
    fn test_duplicate_and_signatures() {
        let functions = FunctionRegistry::new();
        functions.register("add", add()).unwrap();
        assert!(matches!(
            functions.register("add", add()),
            Err(FunctionError::DuplicateFunction(_))
        ));
        assert_eq!(
            functions.signatures(),
            vec![Signature {
                name: "add".into(),
                params: vec!["a".into(), "b".into()],
            }]
        );
    }
}
