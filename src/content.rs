use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::dom::{Document, ElementId, ElementSpec, MemoryDocument};
use crate::error::{AppError, AppResult};
use crate::nav::MAIN_CONTENT_ID;

const BUNDLED: &str = include_str!("../assets/site.toml");

/// Static pages of the site, deserialized from TOML.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SiteContent {
    pub site: SiteInfo,
    pub pages: Vec<PageContent>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SiteInfo {
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub nav: Vec<NavLink>,
    #[serde(default)]
    pub footer: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PageContent {
    pub file: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Section {
    Hero {
        heading: String,
        #[serde(default)]
        text: String,
        #[serde(default)]
        buttons: Vec<String>,
    },
    Text {
        #[serde(default)]
        heading: Option<String>,
        #[serde(default)]
        paragraphs: Vec<String>,
        #[serde(default)]
        links: Vec<NavLink>,
        #[serde(default)]
        animate: bool,
    },
    PetGallery {
        cards: Vec<CardContent>,
    },
    BlogGallery {
        cards: Vec<CardContent>,
    },
    HelpCards {
        cards: Vec<CardContent>,
    },
    ActionCards {
        cards: Vec<CardContent>,
    },
    Stats {
        items: Vec<StatContent>,
    },
    Faq {
        #[serde(default)]
        heading: Option<String>,
        items: Vec<FaqContent>,
    },
    ContactForm {
        fields: Vec<FieldContent>,
        submit: String,
    },
    Enquiry {
        forms: Vec<EnquiryContent>,
    },
    /// Embedded location map.
    Map {
        title: String,
        src: String,
    },
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CardContent {
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<ImageContent>,
    #[serde(default)]
    pub button: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
    /// Real source is swapped in once the image scrolls into view.
    #[serde(default)]
    pub lazy: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StatContent {
    pub number: String,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FaqContent {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Tel,
    Select,
    Textarea,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FieldContent {
    pub name: String,
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EnquiryContent {
    pub key: String,
    pub label: String,
    pub fields: Vec<FieldContent>,
    pub submit: String,
}

impl SiteContent {
    pub fn bundled() -> AppResult<Self> {
        Self::parse(BUNDLED, "bundled site content")
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to read site content: {}", path.display()),
            )
        })?;
        Self::parse(&raw, &path.display().to_string())
    }

    fn parse(raw: &str, origin: &str) -> AppResult<Self> {
        let content = toml::from_str::<Self>(raw).map_err(|source| {
            AppError::invalid_argument(format!("failed to parse {origin}: {source}"))
        })?;
        content.check()?;
        Ok(content)
    }

    fn check(&self) -> AppResult<()> {
        if self.pages.is_empty() {
            return Err(AppError::invalid_argument("site content has no pages"));
        }
        let mut seen = HashSet::new();
        for page in &self.pages {
            if !page.file.ends_with(".html") {
                return Err(AppError::invalid_argument(format!(
                    "page file must end in .html: {}",
                    page.file
                )));
            }
            if !seen.insert(page.file.as_str()) {
                return Err(AppError::invalid_argument(format!(
                    "duplicate page: {}",
                    page.file
                )));
            }
        }
        Ok(())
    }

    /// Looks a page up by file (`pets.html`) or bare name (`pets`).
    pub fn page(&self, name: &str) -> Option<&PageContent> {
        let name = name.trim_start_matches('/');
        self.pages
            .iter()
            .find(|page| page.file == name || page.file.strip_suffix(".html") == Some(name))
    }

    pub fn first_page(&self) -> Option<&PageContent> {
        self.pages.first()
    }

    /// Fresh document for `page`, as a browser would parse it before any
    /// script ran.
    pub fn build_document(&self, page: &PageContent) -> AppResult<MemoryDocument> {
        let mut doc = MemoryDocument::new(format!("/{}", page.file));
        let mut builder = Builder { doc: &mut doc };
        builder.head(&self.site, page)?;
        builder.header(&self.site)?;
        let body = builder.doc.body();
        let main = builder.add(body, ElementSpec::new("main").id(MAIN_CONTENT_ID))?;
        for section in &page.sections {
            builder.section(main, section)?;
        }
        builder.footer(&self.site)?;
        Ok(doc)
    }
}

struct Builder<'a> {
    doc: &'a mut MemoryDocument,
}

impl Builder<'_> {
    fn add(&mut self, parent: ElementId, spec: ElementSpec) -> AppResult<ElementId> {
        let tag = spec.tag.clone();
        self.doc.append_child(parent, spec).ok_or_else(|| {
            AppError::invalid_argument(format!("cannot place <{tag}>: parent is gone"))
        })
    }

    fn head(&mut self, site: &SiteInfo, page: &PageContent) -> AppResult<()> {
        let head = self.doc.head();
        self.add(
            head,
            ElementSpec::new("title").text(format!("{} - {}", page.title, site.title)),
        )?;
        Ok(())
    }

    fn header(&mut self, site: &SiteInfo) -> AppResult<()> {
        let body = self.doc.body();
        let header = self.add(body, ElementSpec::new("header"))?;
        self.add(header, ElementSpec::new("h1").class("site-title").text(&site.title))?;
        if !site.tagline.is_empty() {
            self.add(header, ElementSpec::new("p").class("tagline").text(&site.tagline))?;
        }
        let nav = self.add(header, ElementSpec::new("nav"))?;
        for link in &site.nav {
            self.add(
                nav,
                ElementSpec::new("a").attr("href", &link.href).text(&link.label),
            )?;
        }
        Ok(())
    }

    fn footer(&mut self, site: &SiteInfo) -> AppResult<()> {
        let body = self.doc.body();
        let footer = self.add(body, ElementSpec::new("footer"))?;
        for line in &site.footer {
            self.add(footer, ElementSpec::new("p").text(line))?;
        }
        Ok(())
    }

    fn section(&mut self, main: ElementId, section: &Section) -> AppResult<()> {
        match section {
            Section::Hero {
                heading,
                text,
                buttons,
            } => {
                let hero = self.add(
                    main,
                    ElementSpec::new("section").class("hero").attr("data-animate", ""),
                )?;
                self.add(hero, ElementSpec::new("h2").text(heading))?;
                if !text.is_empty() {
                    self.add(hero, ElementSpec::new("p").text(text))?;
                }
                for label in buttons {
                    self.add(hero, ElementSpec::new("button").class("btn").text(label))?;
                }
            }
            Section::Text {
                heading,
                paragraphs,
                links,
                animate,
            } => {
                let mut spec = ElementSpec::new("section").class("content-section");
                if *animate {
                    spec = spec.attr("data-animate", "");
                }
                let container = self.add(main, spec)?;
                if let Some(heading) = heading {
                    self.add(container, ElementSpec::new("h2").text(heading))?;
                }
                for paragraph in paragraphs {
                    self.add(container, ElementSpec::new("p").text(paragraph))?;
                }
                for link in links {
                    self.add(
                        container,
                        ElementSpec::new("a").attr("href", &link.href).text(&link.label),
                    )?;
                }
            }
            Section::PetGallery { cards } => self.cards(main, "pet-gallery", "pet-card", cards)?,
            Section::BlogGallery { cards } => {
                self.cards(main, "blog-gallery", "blog-card", cards)?
            }
            Section::HelpCards { cards } => self.cards(main, "help-grid", "help-card", cards)?,
            Section::ActionCards { cards } => {
                self.cards(main, "action-grid", "action-card", cards)?
            }
            Section::Stats { items } => {
                let stats = self.add(
                    main,
                    ElementSpec::new("section")
                        .class("stats-section")
                        .attr("data-animate", ""),
                )?;
                for item in items {
                    let stat = self.add(stats, ElementSpec::new("div").class("stat"))?;
                    self.add(
                        stat,
                        ElementSpec::new("span").class("stat-number").text(&item.number),
                    )?;
                    self.add(
                        stat,
                        ElementSpec::new("span").class("stat-label").text(&item.label),
                    )?;
                }
            }
            Section::Faq { heading, items } => {
                let faq = self.add(main, ElementSpec::new("section").class("faq-section"))?;
                if let Some(heading) = heading {
                    self.add(faq, ElementSpec::new("h2").text(heading))?;
                }
                for item in items {
                    let entry = self.add(faq, ElementSpec::new("div").class("faq-item"))?;
                    self.add(
                        entry,
                        ElementSpec::new("div")
                            .class("faq-question")
                            .text(&item.question),
                    )?;
                    let answer = self.add(entry, ElementSpec::new("div").class("faq-answer"))?;
                    self.add(answer, ElementSpec::new("p").text(&item.answer))?;
                }
            }
            Section::ContactForm { fields, submit } => {
                let form = self.add(main, ElementSpec::new("form").id("contact-form"))?;
                self.form_body(form, "contact", fields, submit)?;
            }
            Section::Enquiry { forms } => {
                let tabs = self.add(main, ElementSpec::new("div").class("enquiry-tabs"))?;
                for (index, enquiry) in forms.iter().enumerate() {
                    let mut tab = ElementSpec::new("button")
                        .class("enquiry-tab")
                        .attr("type", "button")
                        .attr("data-tab", &enquiry.key)
                        .text(&enquiry.label);
                    if index == 0 {
                        tab = tab.class("active");
                    }
                    self.add(tabs, tab)?;
                }
                for enquiry in forms {
                    let form = self.add(
                        main,
                        ElementSpec::new("form")
                            .class("enquiry-form")
                            .id(format!("{}-form", enquiry.key)),
                    )?;
                    self.form_body(form, &enquiry.key, &enquiry.fields, &enquiry.submit)?;
                }
            }
            Section::Map { title, src } => {
                let container = self.add(main, ElementSpec::new("div").class("map-container"))?;
                self.add(
                    container,
                    ElementSpec::new("iframe").attr("title", title).attr("src", src),
                )?;
            }
        }
        Ok(())
    }

    fn cards(
        &mut self,
        main: ElementId,
        container_class: &str,
        card_class: &str,
        cards: &[CardContent],
    ) -> AppResult<()> {
        let container = self.add(main, ElementSpec::new("div").class(container_class))?;
        for card in cards {
            let element = self.add(container, ElementSpec::new("div").class(card_class))?;
            if let Some(image) = &card.image {
                let spec = if image.lazy {
                    ElementSpec::new("img")
                        .class("lazy")
                        .attr("src", "")
                        .attr("data-src", &image.src)
                } else {
                    ElementSpec::new("img").attr("src", &image.src)
                };
                self.add(element, spec.attr("alt", &image.alt))?;
            }
            self.add(element, ElementSpec::new("h3").text(&card.title))?;
            if !card.text.is_empty() {
                self.add(element, ElementSpec::new("p").text(&card.text))?;
            }
            if let Some(label) = &card.button {
                self.add(element, ElementSpec::new("button").class("btn").text(label))?;
            }
        }
        Ok(())
    }

    fn form_body(
        &mut self,
        form: ElementId,
        prefix: &str,
        fields: &[FieldContent],
        submit: &str,
    ) -> AppResult<()> {
        for field in fields {
            let group = self.add(form, ElementSpec::new("div").class("form-group"))?;
            let id = format!("{prefix}-{}", field.name);
            self.add(
                group,
                ElementSpec::new("label").attr("for", &id).text(&field.label),
            )?;
            let mut spec = match field.kind {
                FieldType::Select => ElementSpec::new("select"),
                FieldType::Textarea => ElementSpec::new("textarea"),
                FieldType::Text => ElementSpec::new("input").attr("type", "text"),
                FieldType::Email => ElementSpec::new("input").attr("type", "email"),
                FieldType::Tel => ElementSpec::new("input").attr("type", "tel"),
            };
            spec = spec.id(&id).attr("name", &field.name);
            if field.required {
                spec = spec.attr("required", "");
            }
            let control = self.add(group, spec)?;
            if field.kind == FieldType::Select {
                self.add(
                    control,
                    ElementSpec::new("option")
                        .attr("value", "")
                        .text(format!("Select a {}", field.name)),
                )?;
                for option in &field.options {
                    self.add(
                        control,
                        ElementSpec::new("option").attr("value", option).text(option),
                    )?;
                }
            }
            self.doc.set_value(control, "");
        }
        self.add(
            form,
            ElementSpec::new("button")
                .class("btn")
                .attr("type", "submit")
                .text(submit),
        )?;
        Ok(())
    }
}
