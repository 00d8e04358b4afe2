//! HTML serialisation. The only place rich text becomes markup.
//!
//! Output is semantic and unstyled: templates differ only in how columns
//! are arranged. Every piece of user text passes through `escape`.

use uuid::Uuid;

use crate::models::rich_text::RichText;
use crate::models::schema::{
    Award, Basics, Certification, CustomItem, Education, Experience, Interest, Language, Profile,
    Project, Publication, Reference, ResumeDocument, Section, SectionItem, SectionKey, Skill, Url,
    Volunteer, PLACEHOLDER_NAME,
};
use crate::render::templates::{TemplateLayout, TemplateSpec};
use crate::resume::columns::Columns;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One `<p>` per paragraph.
pub fn rich_text_to_html(text: &RichText) -> String {
    text.paragraphs()
        .iter()
        .map(|p| format!("<p>{}</p>", escape(p)))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Item views
// ────────────────────────────────────────────────────────────────────────────

/// The fields a generic item renderer needs.
#[derive(Default)]
pub struct ItemView<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub date: &'a str,
    pub body: Option<&'a RichText>,
    pub keywords: &'a [String],
    pub url: Option<&'a Url>,
}

pub trait RenderItem {
    fn view(&self) -> ItemView<'_>;
}

impl RenderItem for Profile {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.network,
            subtitle: &self.username,
            url: Some(&self.url),
            ..Default::default()
        }
    }
}

impl RenderItem for Experience {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.position,
            subtitle: &self.company,
            date: &self.date,
            body: Some(&self.summary),
            url: Some(&self.url),
            ..Default::default()
        }
    }
}

impl RenderItem for Education {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.institution,
            subtitle: &self.area,
            date: &self.date,
            body: Some(&self.summary),
            url: Some(&self.url),
            ..Default::default()
        }
    }
}

impl RenderItem for Skill {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.name,
            subtitle: &self.description,
            keywords: &self.keywords,
            ..Default::default()
        }
    }
}

impl RenderItem for Project {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.name,
            subtitle: &self.description,
            date: &self.date,
            body: Some(&self.summary),
            keywords: &self.keywords,
            url: Some(&self.url),
        }
    }
}

impl RenderItem for Award {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.title,
            subtitle: &self.awarder,
            date: &self.date,
            body: Some(&self.summary),
            url: Some(&self.url),
            ..Default::default()
        }
    }
}

impl RenderItem for Certification {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.name,
            subtitle: &self.issuer,
            date: &self.date,
            body: Some(&self.summary),
            url: Some(&self.url),
            ..Default::default()
        }
    }
}

impl RenderItem for Language {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.name,
            subtitle: &self.description,
            ..Default::default()
        }
    }
}

impl RenderItem for Volunteer {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.organization,
            subtitle: &self.position,
            date: &self.date,
            body: Some(&self.summary),
            url: Some(&self.url),
            ..Default::default()
        }
    }
}

impl RenderItem for Publication {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.name,
            subtitle: &self.publisher,
            date: &self.date,
            body: Some(&self.summary),
            url: Some(&self.url),
            ..Default::default()
        }
    }
}

impl RenderItem for Interest {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.name,
            keywords: &self.keywords,
            ..Default::default()
        }
    }
}

impl RenderItem for Reference {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.name,
            subtitle: &self.description,
            body: Some(&self.summary),
            url: Some(&self.url),
            ..Default::default()
        }
    }
}

impl RenderItem for CustomItem {
    fn view(&self) -> ItemView<'_> {
        ItemView {
            title: &self.name,
            subtitle: &self.description,
            date: &self.date,
            body: Some(&self.summary),
            keywords: &self.keywords,
            url: Some(&self.url),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

pub fn render_document(
    document: &ResumeDocument,
    columns: &Columns,
    template: &TemplateSpec,
) -> String {
    let mut html = format!(
        r#"<article class="resume template-{}">"#,
        escape(template.id)
    );
    html.push_str(&render_header(&document.basics));

    html.push_str("<main>");
    for key in &columns.main {
        html.push_str(&render_section(document, *key).unwrap_or_default());
    }
    html.push_str("</main>");

    if template.layout == TemplateLayout::TwoColumn {
        html.push_str("<aside>");
        for key in &columns.sidebar {
            html.push_str(&render_section(document, *key).unwrap_or_default());
        }
        html.push_str("</aside>");
    }

    html.push_str("</article>");
    html
}

fn render_header(basics: &Basics) -> String {
    let name = if basics.name.trim().is_empty() {
        PLACEHOLDER_NAME
    } else {
        basics.name.as_str()
    };
    let mut html = format!("<header><h1>{}</h1>", escape(name));
    if !basics.headline.is_empty() {
        html.push_str(&format!(
            r#"<p class="headline">{}</p>"#,
            escape(&basics.headline)
        ));
    }

    let contact: Vec<String> = [&basics.email, &basics.phone, &basics.location]
        .into_iter()
        .filter(|value| !value.trim().is_empty())
        .map(|value| format!("<li>{}</li>", escape(value)))
        .chain((!basics.url.is_empty()).then(|| format!("<li>{}</li>", render_link(&basics.url))))
        .collect();
    if !contact.is_empty() {
        html.push_str(&format!(r#"<ul class="contact">{}</ul>"#, contact.concat()));
    }

    html.push_str("</header>");
    html
}

/// `None` when the section should not be rendered.
pub fn render_section(document: &ResumeDocument, key: SectionKey) -> Option<String> {
    let sections = &document.sections;
    if !sections.content(key).should_render() {
        return None;
    }

    let body = match key {
        SectionKey::Summary => rich_text_to_html(&sections.summary.content),
        SectionKey::Experience => render_items(&sections.experience),
        SectionKey::Education => render_items(&sections.education),
        SectionKey::Skills => render_items(&sections.skills),
        SectionKey::Projects => render_items(&sections.projects),
        SectionKey::Awards => render_items(&sections.awards),
        SectionKey::Certifications => render_items(&sections.certifications),
        SectionKey::Languages => render_items(&sections.languages),
        SectionKey::Volunteer => render_items(&sections.volunteer),
        SectionKey::Publications => render_items(&sections.publications),
        SectionKey::Profiles => render_items(&sections.profiles),
        SectionKey::Interests => render_items(&sections.interests),
        SectionKey::References => render_items(&sections.references),
        SectionKey::Custom => render_items(&sections.custom),
    };

    let name = sections.content(key).display_name();
    let heading = if name.trim().is_empty() {
        key.display_name()
    } else {
        name
    };

    Some(format!(
        r#"<section id="{}"><h2>{}</h2>{}</section>"#,
        key.as_str(),
        escape(heading),
        body
    ))
}

fn render_items<T: SectionItem + RenderItem>(section: &Section<T>) -> String {
    section
        .items
        .iter()
        .filter(|item| item.is_visible())
        .map(|item| render_item(item.id(), &item.view()))
        .collect()
}

fn render_item(id: Uuid, view: &ItemView<'_>) -> String {
    let mut html = format!(r#"<div class="item" data-id="{id}">"#);
    if !view.title.is_empty() {
        html.push_str(&format!("<h3>{}</h3>", escape(view.title)));
    }
    if !view.subtitle.is_empty() {
        html.push_str(&format!(r#"<p class="subtitle">{}</p>"#, escape(view.subtitle)));
    }
    if !view.date.is_empty() {
        html.push_str(&format!(r#"<p class="date">{}</p>"#, escape(view.date)));
    }
    if let Some(body) = view.body.filter(|b| !b.is_blank()) {
        html.push_str(&rich_text_to_html(body));
    }
    if !view.keywords.is_empty() {
        let keywords: String = view
            .keywords
            .iter()
            .map(|k| format!("<li>{}</li>", escape(k)))
            .collect();
        html.push_str(&format!(r#"<ul class="keywords">{keywords}</ul>"#));
    }
    if let Some(url) = view.url.filter(|u| !u.is_empty()) {
        html.push_str(&render_link(url));
    }
    html.push_str("</div>");
    html
}

const LINK_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Relative links and the schemes in `LINK_SCHEMES` are clickable.
fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    let end = href.find(['/', '?', '#']).unwrap_or(href.len());
    match href[..end].find(':') {
        None => true,
        Some(colon) => LINK_SCHEMES
            .iter()
            .any(|scheme| href[..colon].eq_ignore_ascii_case(scheme)),
    }
}

fn render_link(url: &Url) -> String {
    let label = if url.label.trim().is_empty() {
        &url.href
    } else {
        &url.label
    };
    if is_safe_href(&url.href) {
        format!(r#"<a href="{}">{}</a>"#, escape(url.href.trim()), escape(label))
    } else {
        format!(r#"<span class="link">{}</span>"#, escape(label))
    }
}
