//! Prompt template sources.
//!
//! Kept as string constants so the renderer has no filesystem
//! dependency; the registered names ("idea", "post") are the public
//! contract.

/// Produces a short structured post idea. The first line of the output
/// is expected to carry a discoverable `Title:` line.
pub const IDEA_TEMPLATE: &str = r#"You are a content strategist for a professional audience.

Using the reference material below, propose ONE concrete idea for a post.

Reference keywords:
{{ keywords }}
{% if reference_posts %}
Reference posts (match their tone and style):
{% for post in reference_posts %}
---
{{ post }}
{% endfor %}{% endif %}
Respond in exactly this shape:
Title: <a one-line title>
<two to four sentences describing the angle, the audience, and the takeaway>"#;

/// Produces a full post body from an idea.
pub const POST_TEMPLATE: &str = r#"You are a professional content writer.

Write a complete, ready-to-publish post based on this idea:
{{ idea }}

Original reference keywords:
{{ keywords }}
{% if reference_posts %}
Reference posts (match their tone, structure and length):
{% for post in reference_posts %}
---
{{ post }}
{% endfor %}{% endif %}
Write only the post body. No preamble, no commentary, no hashtag spam."#;
