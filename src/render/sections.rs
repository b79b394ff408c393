//! One renderer per page slot.
//!
//! Every function returns the slot's fixed container filled from the section
//! fields. Empty text fields render as empty elements, never as placeholders,
//! except on the package detail page which has its own fallbacks.

use super::markup::Element;
use crate::{
    config::{Layout, SiteSection},
    content::{
        AboutSection, FooterSection, GallerySection, HeaderSection, HeroSection, Link, Package,
        PackagesSection,
    },
};
use serde_json::json;

/// Shown when the requested package cannot be resolved.
pub const NOT_FOUND_MESSAGE: &str = "Pacote não encontrado.";

const DEFAULT_DURATION: &str = "Duração sob consulta";
const DEFAULT_DESCRIPTION: &str = "Descrição detalhada em breve.";
const DEFAULT_INCLUDED: &str = "Sob consulta";

// ============================================================================
// Context
// ============================================================================

/// How package listings link to the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLinks {
    /// `pacote-detalhes.html?id=<id>`, resolved per request.
    Query,
    /// `pacote-detalhes/<id>.html`, one pre-rendered file per package.
    Static,
}

impl DetailLinks {
    pub fn href(self, id: &str) -> String {
        match self {
            DetailLinks::Query => {
                format!("pacote-detalhes.html?id={}", urlencoding::encode(id))
            }
            DetailLinks::Static => {
                format!("pacote-detalhes/{}.html", urlencoding::encode(id))
            }
        }
    }
}

/// Settings shared by every section of one page.
#[derive(Debug, Clone, Copy)]
pub struct Ctx<'a> {
    pub site: &'a SiteSection,
    pub links: DetailLinks,
    /// `""` at the site root, `"../"` one directory down.
    pub prefix: &'static str,
}

impl Ctx<'_> {
    /// Resolve a site-relative URL from the current page.
    pub fn url(&self, url: &str) -> String {
        if self.prefix.is_empty() || !is_relative(url) {
            url.to_owned()
        } else {
            format!("{}{url}", self.prefix)
        }
    }
}

/// Whether `url` is a relative path (no scheme, no leading `/`, `#` or `?`).
fn is_relative(url: &str) -> bool {
    if url.is_empty() || url.starts_with(['/', '#', '?']) {
        return false;
    }
    // A scheme ends at the first ':' that precedes any '/'
    match (url.find(':'), url.find('/')) {
        (Some(colon), Some(slash)) => colon > slash,
        (Some(_), None) => false,
        _ => true,
    }
}

fn background(url: &str) -> String {
    format!("background-image: url('{url}');")
}

fn icon(class: &'static str) -> Element {
    Element::new("i").class(class)
}

fn link_list(ctx: &Ctx, links: &[Link]) -> Element {
    Element::new("ul").children(links.iter().map(|link| {
        Element::new("li").child(
            Element::new("a")
                .attr("href", ctx.url(&link.href))
                .text(link.label.as_str()),
        )
    }))
}

// ============================================================================
// Header
// ============================================================================

pub fn header(ctx: &Ctx, section: &HeaderSection) -> Element {
    let logo = &section.logo;

    let mut brand = Element::new("div").class("brand");
    if !logo.image.is_empty() {
        brand = brand.child(
            Element::new("img")
                .class("site-logo")
                .attr("src", ctx.url(&logo.image))
                .attr("alt", format!("{} {}", logo.text, logo.subtext)),
        );
    }
    brand = brand.child(
        Element::new("span")
            .class("logo")
            .text(format!("{} ", logo.text))
            .child(Element::new("span").class("logo-tours").text(logo.subtext.as_str())),
    );

    let mut container = Element::new("div")
        .class("container")
        .child(brand)
        .child(
            Element::new("nav")
                .class("main-nav")
                .child(link_list(ctx, &section.navigation)),
        );

    if !section.book_button.is_empty() {
        container = container.child(
            Element::new("a")
                .class("book-btn")
                .attr("href", ctx.url("index.html#pacotes"))
                .text(section.book_button.as_str()),
        );
    }

    Element::new("header").class("site-header").child(container)
}

// ============================================================================
// Hero
// ============================================================================

pub fn hero(ctx: &Ctx, section: &HeroSection) -> Element {
    let title = Element::new("h1")
        .text(format!("{} ", section.title))
        .child(
            Element::new("span")
                .class("primary-color-text")
                .text(section.title_highlight.as_str()),
        )
        .text(format!(" {}", section.title_suffix))
        .child(
            Element::new("div")
                .class("arrow-icon")
                .child(icon("fas fa-arrow-right")),
        );

    let text = Element::new("div")
        .class("hero-text")
        .child(Element::new("p").class("tagline").text(section.tagline.as_str()))
        .child(title)
        .child(
            Element::new("p")
                .class("description")
                .text(section.description.as_str()),
        );

    let mut circle = Element::new("div").class("circle-image");
    let image = section.image_url();
    if !image.is_empty() {
        circle = circle.attr("style", background(&ctx.url(image)));
    }

    let stats = Element::new("div").class("stat-cards").children(
        section.stats.iter().map(|stat| {
            let label = if stat.is_since() {
                Element::new("p")
                    .class("stat-label")
                    .text(stat.label.as_str())
                    .child(Element::new("br"))
                    .text(stat.number.as_str())
            } else {
                Element::new("p")
                    .class("stat-label")
                    .child(Element::new("span").text(stat.number.as_str()))
                    .child(Element::new("br"))
                    .text(stat.label.as_str())
            };
            Element::new("div")
                .class("stat-item")
                .child(
                    Element::new("img")
                        .attr("src", ctx.url(&stat.image))
                        .attr("alt", stat.label.as_str()),
                )
                .child(label)
        }),
    );

    Element::new("section").class("hero").id("inicio").child(
        Element::new("div")
            .class("container")
            .child(text)
            .child(Element::new("div").class("hero-image").child(circle).child(stats)),
    )
}

// ============================================================================
// Lists
// ============================================================================

/// Wrap list items in the structure their layout needs.
///
/// `name` prefixes the container classes (`gallery-grid`, `gallery-slider`,
/// `gallery-pagination`).
fn list(name: &str, layout: Layout, options: serde_json::Value, items: Vec<Element>) -> Element {
    let grid_class = format!("{name}-grid");
    match layout {
        Layout::Grid => Element::new("div").class(grid_class).children(items),
        Layout::Slider => Element::new("div")
            .class(format!("swiper {name}-slider"))
            .attr("data-carousel", options.to_string())
            .child(
                Element::new("div")
                    .class(format!("swiper-wrapper {grid_class}"))
                    .children(items.into_iter().map(|item| item.prepend_class("swiper-slide"))),
            )
            .child(Element::new("div").class(format!("swiper-pagination {name}-pagination"))),
    }
}

fn carousel_options(name: &str, space_between: u32, slides_per_view: f64, centered: bool) -> serde_json::Value {
    let mut options = json!({
        "loop": true,
        "spaceBetween": space_between,
        "pagination": { "el": format!(".{name}-pagination"), "clickable": true },
        "slidesPerView": slides_per_view,
        // From 769px wide the carousel is disabled and the grid CSS applies
        "breakpoints": {
            "769": {
                "enabled": false,
                "slidesPerView": "auto",
                "spaceBetween": 0
            }
        }
    });
    if centered {
        options["centeredSlides"] = json!(true);
    }
    options
}

fn heading(title: &str, subtitle: &str) -> [Element; 2] {
    [
        Element::new("h2").text(title),
        Element::new("p").class("subtitle").text(subtitle),
    ]
}

pub fn gallery(ctx: &Ctx, section: &GallerySection) -> Element {
    let items = section
        .items
        .iter()
        .map(|item| {
            Element::new("div")
                .class("gallery-item")
                .child(
                    Element::new("img")
                        .attr("src", ctx.url(&item.image))
                        .attr("alt", item.caption.as_str())
                        .attr("loading", "lazy"),
                )
                .child(
                    Element::new("div")
                        .class("gallery-overlay")
                        .child(Element::new("p").text(item.caption.as_str())),
                )
        })
        .collect();

    let options = carousel_options("gallery", 10, 1.5, true);
    Element::new("section").class("gallery-section").id("galeria").child(
        Element::new("div")
            .class("container")
            .children(heading(&section.title, &section.subtitle))
            .child(list("gallery", ctx.site.gallery_layout, options, items)),
    )
}

pub fn packages(ctx: &Ctx, section: &PackagesSection) -> Element {
    let currency = &ctx.site.currency;
    let items = section
        .items
        .iter()
        .map(|pkg| {
            let meta = Element::new("div")
                .class("package-meta")
                .child(
                    Element::new("span")
                        .class("price-tag")
                        .text(format!("{currency} {} / Pessoa", pkg.price)),
                )
                .child(
                    Element::new("a")
                        .class("view-details-btn")
                        .attr("href", ctx.url(&ctx.links.href(&pkg.id)))
                        .text("Ver Detalhes ")
                        .child(icon("fas fa-arrow-right")),
                );

            Element::new("div")
                .class("package-item")
                .child(
                    Element::new("div")
                        .class("package-img")
                        .attr("style", background(&ctx.url(&pkg.image))),
                )
                .child(
                    Element::new("div")
                        .class("package-info")
                        .child(
                            Element::new("p")
                                .class("location")
                                .child(icon("fas fa-map-marker-alt"))
                                .text(format!(" {}", pkg.location)),
                        )
                        .child(Element::new("h4").text(pkg.title.as_str()))
                        .child(meta),
                )
        })
        .collect();

    let options = carousel_options("packages", 20, 1.1, false);
    Element::new("section").class("popular-packages").id("pacotes").child(
        Element::new("div")
            .class("container")
            .children(heading(&section.title, &section.subtitle))
            .child(list("packages", ctx.site.packages_layout, options, items)),
    )
}

// ============================================================================
// About
// ============================================================================

pub fn about(ctx: &Ctx, section: &AboutSection) -> Element {
    let text = Element::new("div")
        .class("about-text")
        .children(heading(&section.title, &section.subtitle))
        .child(
            Element::new("div")
                .class("about-description")
                .child(Element::new("p").text(section.text.as_str())),
        );

    let mut image = Element::new("div").class("about-image");
    if !section.image.is_empty() {
        image = image.child(
            Element::new("img")
                .id("about-img")
                .attr("src", ctx.url(&section.image))
                .attr("alt", section.title.as_str()),
        );
    }

    let values = Element::new("div")
        .class("about-values")
        .children(section.values.iter().map(|value| {
            Element::new("div")
                .class("value-item")
                .child(Element::new("h3").text(value.title.as_str()))
                .child(Element::new("p").text(value.desc.as_str()))
        }));

    Element::new("section").class("about-section").child(
        Element::new("div")
            .class("container")
            .child(text)
            .child(image)
            .child(values),
    )
}

// ============================================================================
// Footer
// ============================================================================

pub fn footer(ctx: &Ctx, section: &FooterSection) -> Element {
    let (logo_text, logo_sub) = section.logo_parts();
    let social = &section.social;

    let about = Element::new("div")
        .class("col footer-about")
        .child(
            Element::new("div")
                .class("logo")
                .text(format!("{logo_text} "))
                .child(Element::new("span").class("logo-tours").text(logo_sub)),
        )
        .child(Element::new("p").text(section.description.as_str()))
        .child(
            Element::new("div")
                .class("social-links")
                .child(
                    Element::new("a")
                        .attr("href", social.instagram.as_str())
                        .attr("target", "_blank")
                        .child(icon("fab fa-instagram")),
                )
                .child(
                    Element::new("a")
                        .attr("href", social.facebook.as_str())
                        .child(icon("fab fa-facebook-f")),
                )
                .child(
                    Element::new("a")
                        .attr("href", social.whatsapp.as_str())
                        .attr("target", "_blank")
                        .child(icon("fab fa-whatsapp")),
                ),
        );

    let column = |title: &str, links: &[Link]| {
        Element::new("div")
            .class("col")
            .child(Element::new("h4").text(title))
            .child(link_list(ctx, links))
    };

    Element::new("footer")
        .class("site-footer")
        .child(
            Element::new("div")
                .class("container footer-grid")
                .child(about)
                .child(column("Destinos", &section.destinations))
                .child(column("Suporte", &section.support)),
        )
        .child(
            Element::new("div").class("copyright").child(
                Element::new("div")
                    .class("container")
                    .text(section.copyright.as_str()),
            ),
        )
}

// ============================================================================
// Package Detail
// ============================================================================

/// WhatsApp booking link for a package.
pub fn whatsapp_link(phone: &str, title: &str) -> String {
    let message = format!("Olá, gostaria de reservar o pacote *{title}* para a data...");
    format!("https://wa.me/{phone}?text={}", urlencoding::encode(&message))
}

/// Render the detail container for `pkg`, or the inline not-found message.
pub fn package_detail(ctx: &Ctx, pkg: Option<&Package>) -> Element {
    let container = Element::new("div").id("package-details-container");
    let Some(pkg) = pkg else {
        return container.child(
            Element::new("div")
                .class("container error")
                .text(NOT_FOUND_MESSAGE),
        );
    };

    let or_default = |value: &str, default: &'static str| -> String {
        if value.is_empty() { default } else { value }.to_owned()
    };

    let banner = Element::new("section")
        .class("package-header")
        .attr("style", background(&ctx.url(&pkg.image)))
        .child(
            Element::new("div").class("container").child(
                Element::new("div")
                    .class("header-content")
                    .child(
                        Element::new("span")
                            .class("location")
                            .child(icon("fas fa-map-marker-alt"))
                            .text(format!(" {}", pkg.location)),
                    )
                    .child(Element::new("h1").text(pkg.title.as_str()))
                    .child(
                        Element::new("span")
                            .class("duration")
                            .child(icon("far fa-clock"))
                            .text(format!(" {}", or_default(&pkg.duration, DEFAULT_DURATION))),
                    ),
            ),
        );

    let mut checklist = Element::new("ul").class("checklist");
    let mut any_included = false;
    for item in pkg.included_items() {
        any_included = true;
        checklist = checklist.child(
            Element::new("li")
                .child(icon("fas fa-check"))
                .text(format!(" {item}")),
        );
    }
    if !any_included {
        checklist = checklist.child(Element::new("li").text(DEFAULT_INCLUDED));
    }

    let content = Element::new("div")
        .class("details-content")
        .child(
            Element::new("div")
                .class("info-card")
                .child(Element::new("h2").text("Sobre o Roteiro"))
                .child(
                    Element::new("div")
                        .class("description-text")
                        .text(or_default(&pkg.description_long, DEFAULT_DESCRIPTION)),
                ),
        )
        .child(
            Element::new("div")
                .class("info-card")
                .child(Element::new("h2").text("O que está incluído"))
                .child(checklist),
        );

    let features = ["Reserva imediata", "Pagamento seguro", "Suporte 24/7"]
        .into_iter()
        .map(|feature| {
            Element::new("div")
                .class("feature-item")
                .child(icon("fas fa-check-circle"))
                .child(Element::new("span").text(feature))
        });

    let sidebar = Element::new("aside").class("details-sidebar").child(
        Element::new("div")
            .class("booking-card")
            .child(
                Element::new("div")
                    .class("price-box")
                    .child(Element::new("span").class("price-label").text("Preço por pessoa"))
                    .child(Element::new("span").class("price-amount").text(pkg.price.as_str()))
                    .child(
                        Element::new("span")
                            .class("price-unit")
                            .text(ctx.site.currency.as_str()),
                    ),
            )
            .child(Element::new("div").class("booking-features").children(features))
            .child(
                Element::new("a")
                    .class("whatsapp-btn")
                    .attr("href", whatsapp_link(&ctx.site.whatsapp, &pkg.title))
                    .attr("target", "_blank")
                    .child(icon("fab fa-whatsapp"))
                    .text(" Reservar Agora"),
            ),
    );

    container.child(banner).child(
        Element::new("section").class("package-main").child(
            Element::new("div").class("container").child(
                Element::new("div")
                    .class("details-grid")
                    .child(content)
                    .child(sidebar),
            ),
        ),
    )
}
