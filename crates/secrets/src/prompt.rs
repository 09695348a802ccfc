//! Interactive masked input as a value source

use envium_core::{Error, Result};
use envium_tree::{SourceRequest, ValueSource};
use std::fmt;
use std::io;
use zeroize::Zeroizing;

/// Reads one secret given the prompt text
pub type PromptFn = Box<dyn FnMut(&str) -> io::Result<Zeroizing<String>> + Send>;

/// Asks the user for every leaf that has no value of its own.
///
/// Never overrides a default, and the tree asks at most once per leaf.
pub struct PromptSource {
    prompt: PromptFn,
}

impl PromptSource {
    /// Prompt on the terminal without echoing input
    #[must_use]
    pub fn masked() -> Self {
        Self::from_fn(|text| rpassword::prompt_password(text).map(Zeroizing::new))
    }

    /// Use a custom input function, e.g. a scripted one in tests
    pub fn from_fn<F>(prompt: F) -> Self
    where
        F: FnMut(&str) -> io::Result<Zeroizing<String>> + Send + 'static,
    {
        Self {
            prompt: Box::new(prompt),
        }
    }
}

impl Default for PromptSource {
    fn default() -> Self {
        Self::masked()
    }
}

impl fmt::Debug for PromptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptSource").finish_non_exhaustive()
    }
}

impl ValueSource for PromptSource {
    fn name(&self) -> &str {
        "prompt"
    }

    fn lookup(&mut self, request: &SourceRequest<'_>) -> Result<Option<String>> {
        let text = match request.type_spec {
            Some(spec) => format!("{} ({spec}): ", request.fullname),
            None => format!("{}: ", request.fullname),
        };
        tracing::debug!(key = %request.key, "prompting for secret");

        let secret = (self.prompt)(&text).map_err(|e| Error::secret_prompt(request.key, e))?;
        Ok(Some(secret.as_str().to_owned()))
    }

    fn consult_when_defaulted(&self) -> bool {
        false
    }
}
