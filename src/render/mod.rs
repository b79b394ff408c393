//! Public page renderer.
//!
//! Pages are pure functions of a [`Document`](crate::content::Document):
//! `render_page` builds a [`markup::Element`] tree and [`render_html`]
//! serializes it with every piece of content text escaped.

pub mod markup;
mod page;
pub mod sections;

pub use page::{Page, RenderOptions, package_id_from_query, render_html};
pub use sections::DetailLinks;
