//! Page templates: which slots a page carries and the document around them.

use super::{
    markup::{Element, Node},
    sections::{self, Ctx, DetailLinks},
};
use crate::{
    config::{HeadConfig, Layout, SiteConfig, SiteSection},
    content::Document,
    utils::mime::{essence, guess_content_type},
};
use std::path::Path;

const DOCTYPE: &str = "<!DOCTYPE html>";

/// Navigates to the body's `data-admin-href` on Ctrl+Shift+A.
const ADMIN_SHORTCUT: &str = r#"<script>(function(){var href=document.body.getAttribute("data-admin-href");document.addEventListener("keydown",function(e){if(e.ctrlKey&&e.shiftKey&&(e.key==="a"||e.key==="A")){e.preventDefault();window.location.href=href;}});})();</script>"#;

/// Starts every `data-carousel` list once Swiper is loaded.
const CAROUSEL_INIT: &str = r#"<script>(function(){if(typeof Swiper==="undefined")return;document.querySelectorAll("[data-carousel]").forEach(function(el){new Swiper(el,JSON.parse(el.dataset.carousel));});})();</script>"#;

/// A fixed place on a page where one section renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Header,
    Hero,
    Gallery,
    Packages,
    About,
    PackageDetail,
    Footer,
}

/// The public pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// `index.html`
    Home,
    /// `sobre.html`
    About,
    /// `pacote-detalhes.html?id=...`, carrying the requested id.
    PackageDetail(Option<String>),
}

impl Page {
    pub const fn slots(&self) -> &'static [Slot] {
        match self {
            Page::Home => &[
                Slot::Header,
                Slot::Hero,
                Slot::Gallery,
                Slot::Packages,
                Slot::Footer,
            ],
            Page::About => &[Slot::Header, Slot::About, Slot::Footer],
            Page::PackageDetail(_) => &[Slot::Header, Slot::PackageDetail, Slot::Footer],
        }
    }

    /// Output path relative to the site root.
    pub fn path(&self, links: DetailLinks) -> String {
        match (self, links) {
            (Page::Home, _) => "index.html".into(),
            (Page::About, _) => "sobre.html".into(),
            (Page::PackageDetail(Some(id)), DetailLinks::Static) => {
                format!("pacote-detalhes/{id}.html")
            }
            (Page::PackageDetail(_), _) => "pacote-detalhes.html".into(),
        }
    }

    /// Prefix leading from the page back to the site root.
    fn root_prefix(&self, links: DetailLinks) -> &'static str {
        match (self, links) {
            (Page::PackageDetail(Some(_)), DetailLinks::Static) => "../",
            _ => "",
        }
    }
}

/// Settings a page render reads from the site configuration.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub site: &'a SiteSection,
    pub head: &'a HeadConfig,
    pub links: DetailLinks,
}

impl<'a> RenderOptions<'a> {
    pub fn from_config(config: &'a SiteConfig, links: DetailLinks) -> Self {
        Self {
            site: &config.site,
            head: &config.build.head,
            links,
        }
    }
}

/// Render a full HTML document, doctype included.
pub fn render_html(page: &Page, document: &Document, options: &RenderOptions) -> String {
    format!("{DOCTYPE}{}", render_page(page, document, options).to_html())
}

/// Render the `<html>` element of a page.
///
/// Slots whose section is absent from the document are skipped.
pub fn render_page(page: &Page, document: &Document, options: &RenderOptions) -> Element {
    let ctx = Ctx {
        site: options.site,
        links: options.links,
        prefix: page.root_prefix(options.links),
    };

    let requested = match page {
        Page::PackageDetail(Some(id)) => document.find_package(id),
        _ => None,
    };

    let mut header = None;
    let mut footer = None;
    let mut carousel = false;
    let mut main = Element::new("main");
    for slot in page.slots() {
        match slot {
            Slot::Header => header = document.header.as_ref().map(|s| sections::header(&ctx, s)),
            Slot::Footer => footer = document.footer.as_ref().map(|s| sections::footer(&ctx, s)),
            Slot::Hero => {
                if let Some(section) = &document.hero {
                    main = main.child(sections::hero(&ctx, section));
                }
            }
            Slot::Gallery => {
                if let Some(section) = &document.gallery {
                    carousel |= options.site.gallery_layout == Layout::Slider;
                    main = main.child(sections::gallery(&ctx, section));
                }
            }
            Slot::Packages => {
                if let Some(section) = &document.packages {
                    carousel |= options.site.packages_layout == Layout::Slider;
                    main = main.child(sections::packages(&ctx, section));
                }
            }
            Slot::About => {
                if let Some(section) = &document.about {
                    main = main.child(sections::about(&ctx, section));
                }
            }
            Slot::PackageDetail => {
                main = main.child(sections::package_detail(&ctx, requested));
            }
        }
    }

    let site_name = &options.site.name;
    let title = match (page, requested) {
        (Page::Home, _) => site_name.clone(),
        (Page::About, _) => format!("Sobre Nós - {site_name}"),
        (Page::PackageDetail(_), Some(pkg)) => format!("{} - {site_name}", pkg.title),
        (Page::PackageDetail(_), None) => site_name.clone(),
    };

    let body = Element::new("body")
        .attr("data-admin-href", ctx.url(&options.site.admin_login))
        .children(header)
        .child(main)
        .children(footer)
        .children(carousel.then_some(Node::Raw(CAROUSEL_INIT)))
        .child(Node::Raw(ADMIN_SHORTCUT));

    Element::new("html")
        .attr("lang", options.site.language.as_str())
        .child(head(&ctx, options.head, &title))
        .child(body)
}

fn head(ctx: &Ctx, config: &HeadConfig, title: &str) -> Element {
    let mut head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1.0"),
        )
        .child(Element::new("title").text(title));

    if let Some(icon) = &config.icon {
        head = head.child(
            Element::new("link")
                .attr("rel", "shortcut icon")
                .attr("href", ctx.url(icon))
                .attr("type", essence(guess_content_type(Path::new(icon)))),
        );
    }

    for style in &config.styles {
        head = head.child(
            Element::new("link")
                .attr("rel", "stylesheet")
                .attr("href", ctx.url(style)),
        );
    }

    for script in &config.scripts {
        let mut el = Element::new("script").attr("src", ctx.url(script.src()));
        if script.is_defer() {
            el = el.attr("defer", "");
        }
        if script.is_async() {
            el = el.attr("async", "");
        }
        head = head.child(el);
    }

    head
}

/// Read the package id from a query string (`id=...`, with or without `?`).
///
/// `+` decodes to a space and percent escapes are decoded. A missing or empty
/// id yields `None`.
pub fn package_id_from_query(query: &str) -> Option<String> {
    let decode = |raw: &str| {
        let raw = raw.replace('+', " ");
        match urlencoding::decode(&raw) {
            Ok(text) => text.into_owned(),
            Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes()))
                .into_owned(),
        }
    };

    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| decode(key) == "id")
        .map(|(_, value)| decode(value))
        .filter(|id| !id.is_empty())
}
