//! Prompt rendering against named templates.
//!
//! Templates are minijinja sources registered by name; the two used in
//! practice are `"idea"` and `"post"` (see [`templates`]). Rendering is
//! pure: same template and context in, same prompt out, no side effects.

pub mod templates;

use minijinja::{Environment, UndefinedBehavior, Value};
use serde::Serialize;
use thiserror::Error;

/// Context for rendering a prompt template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptContext {
    /// Pre-processed keywords / reference text.
    pub keywords: String,

    /// Prior example posts supplied as style references.
    pub reference_posts: Vec<String>,

    /// The generated idea, required by the post template.
    pub idea: Option<String>,
}

/// Errors from prompt rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No template registered under the requested name
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Template exists but could not be rendered against the context
    #[error("failed to render template '{name}': {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Renders named templates into final prompt strings.
pub struct PromptRenderer {
    env: Environment<'static>,
}

impl PromptRenderer {
    /// Create a renderer with the built-in idea and post templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        // Unresolvable placeholders are render errors, not silent blanks.
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("idea", templates::IDEA_TEMPLATE)
            .expect("built-in idea template is valid");
        env.add_template("post", templates::POST_TEMPLATE)
            .expect("built-in post template is valid");

        Self { env }
    }

    /// Register an additional template source.
    pub fn add_template(
        &mut self,
        name: &'static str,
        source: &'static str,
    ) -> Result<(), RenderError> {
        self.env
            .add_template(name, source)
            .map_err(|e| RenderError::Render {
                name: name.to_string(),
                source: e,
            })
    }

    /// Render the named template against the context.
    pub fn render(&self, name: &str, context: &PromptContext) -> Result<String, RenderError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|_| RenderError::TemplateNotFound(name.to_string()))?;

        template
            .render(Value::from_serialize(context))
            .map_err(|e| RenderError::Render {
                name: name.to_string(),
                source: e,
            })
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PromptContext {
        PromptContext {
            keywords: "reusable rockets".into(),
            reference_posts: vec!["An older post about launch costs.".into()],
            idea: Some("Title: Why boosters land now".into()),
        }
    }

    #[test]
    fn test_idea_template_renders_keywords_and_references() {
        let renderer = PromptRenderer::new();
        let prompt = renderer.render("idea", &context()).unwrap();

        assert!(prompt.contains("reusable rockets"));
        assert!(prompt.contains("An older post about launch costs."));
        assert!(prompt.contains("Title:"));
    }

    #[test]
    fn test_idea_template_without_references() {
        let renderer = PromptRenderer::new();
        let ctx = PromptContext {
            keywords: "rockets".into(),
            ..Default::default()
        };
        let prompt = renderer.render("idea", &ctx).unwrap();

        assert!(prompt.contains("rockets"));
        assert!(!prompt.contains("Reference posts"));
    }

    #[test]
    fn test_post_template_includes_idea() {
        let renderer = PromptRenderer::new();
        let prompt = renderer.render("post", &context()).unwrap();

        assert!(prompt.contains("Why boosters land now"));
        assert!(prompt.contains("reusable rockets"));
    }

    #[test]
    fn test_unknown_template_fails() {
        let renderer = PromptRenderer::new();
        let err = renderer.render("summary", &context()).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound(_)));
    }

    #[test]
    fn test_unresolved_placeholder_is_a_render_error() {
        let mut renderer = PromptRenderer::new();
        renderer
            .add_template("needs-topic", "Write about {{ topic }}")
            .unwrap();

        let err = renderer.render("needs-topic", &context()).unwrap_err();
        assert!(matches!(err, RenderError::Render { .. }));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let renderer = PromptRenderer::new();
        let a = renderer.render("post", &context()).unwrap();
        let b = renderer.render("post", &context()).unwrap();
        assert_eq!(a, b);
    }
}
