use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::models::CmsSection;
use crate::components::editable_image::EditableImage;
use crate::components::editable_layout::EditableLayout;
use crate::components::editable_text::EditableText;
use crate::components::providers::use_language;
use crate::pages::cms::{use_cms_page, PageContent};
use crate::Route;

pub const HOME_SLUG: &str = "home";

/// Stored value of a section field, `None` while the section doesn't exist.
/// An empty field stays empty so editors start from what is actually saved.
fn section_value(section: Option<&CmsSection>, field: &str) -> Option<String> {
    section.map(|s| s.field(field))
}

#[derive(Properties, PartialEq)]
struct SectionTextProps {
    section: Option<CmsSection>,
    field: AttrValue,
    fallback: AttrValue,
    #[prop_or(AttrValue::from("span"))]
    tag: AttrValue,
    #[prop_or_default]
    multiline: bool,
    #[prop_or_default]
    class: Classes,
}

/// Editable when the section exists, plain text otherwise.
#[function_component]
fn SectionText(props: &SectionTextProps) -> Html {
    match (&props.section, section_value(props.section.as_ref(), &props.field)) {
        (Some(section), Some(value)) => html! {
            <EditableText
                section_id={section.id}
                field_name={props.field.clone()}
                {value}
                placeholder={props.fallback.clone()}
                tag={props.tag.clone()}
                multiline={props.multiline}
                class={props.class.clone()}
            />
        },
        _ => html! {
            <@{props.tag.to_string()} class={props.class.clone()}>{props.fallback.to_string()}</@>
        },
    }
}

#[function_component]
pub fn Home() -> Html {
    let lang = use_language();
    let content = use_cms_page(HOME_SLUG);

    let hero = content.section("hero").cloned();
    let about = content.section("about").cloned();
    let cta = content.section("cta").cloned();

    let status = match &content {
        PageContent::Loading => html! { <p class="muted page-status">{lang.t("common.loading")}</p> },
        PageContent::Failed(message) => html! {
            <p class="form-error page-status">{format!("Could not load page content: {}", message)}</p>
        },
        PageContent::Loaded(_) => html! {},
    };

    let hero_image = match &hero {
        Some(section) => html! {
            <EditableImage
                section_id={section.id}
                src={section.field("imageUrl")}
                fallback_src="/assets/hero.jpg"
                alt="Trading charts"
                class={classes!("hero-image")}
            />
        },
        None => html! { <img class="hero-image" src="/assets/hero.jpg" alt="Trading charts" /> },
    };

    html! {
        <EditableLayout page_slug={HOME_SLUG}>
            <style>
            {r#".home-hero {
                display: grid;
                grid-template-columns: 1.2fr 1fr;
                gap: 3rem;
                align-items: center;
                padding: 6rem 2rem 4rem;
                max-width: 1200px;
                margin: 0 auto;
            }
            .home-hero h1 {
                font-size: 3rem;
                line-height: 1.1;
                margin-bottom: 1rem;
            }
            .home-hero .hero-subtitle {
                display: block;
                font-size: 1.2rem;
                color: var(--text-muted);
                margin-bottom: 2rem;
            }
            .hero-image {
                width: 100%;
                border-radius: 16px;
                box-shadow: 0 8px 32px rgba(0, 0, 0, 0.3);
            }
            .home-about, .home-cta {
                max-width: 900px;
                margin: 0 auto;
                padding: 3rem 2rem;
            }
            .home-cta {
                text-align: center;
            }
            @media (max-width: 768px) {
                .home-hero {
                    grid-template-columns: 1fr;
                    padding-top: 5rem;
                }
                .home-hero h1 {
                    font-size: 2.2rem;
                }
            }"#}
            </style>
            {status}
            <section class="home-hero">
                <div>
                    <SectionText section={hero.clone()} field="title" tag="h1"
                        fallback="Learn to trade with a plan" />
                    <SectionText section={hero.clone()} field="subtitle" class={classes!("hero-subtitle")}
                        fallback="Structured courses, live sessions and a community that keeps you accountable." />
                    <Link<Route> to={Route::Courses { slug: "foundations".to_string() }} classes="primary-button">
                        {lang.t("nav.courses")}
                    </Link<Route>>
                </div>
                {hero_image}
            </section>
            <section class="home-about">
                <SectionText section={about.clone()} field="title" tag="h2" fallback="Why the academy" />
                <SectionText section={about} field="content" tag="p" multiline={true}
                    fallback="Every lesson ends with a short quiz so you know what stuck before moving on." />
            </section>
            <section class="home-cta">
                <SectionText section={cta.clone()} field="title" tag="h2" fallback="Ready to start?" />
                <SectionText section={cta} field="content" tag="p" multiline={true}
                    fallback="Pick an offer and pay by bank transfer. Access is granted once the transfer is confirmed." />
            </section>
        </EditableLayout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_fields_are_passed_through_unfilled() {
        let section: CmsSection = serde_json::from_value(json!({
            "id": 4,
            "section_key": "hero",
            "content": { "title": "Trade smarter", "subtitle": "" }
        }))
        .unwrap();
        assert_eq!(section_value(Some(&section), "title").as_deref(), Some("Trade smarter"));
        assert_eq!(section_value(Some(&section), "subtitle").as_deref(), Some(""));
        assert_eq!(section_value(Some(&section), "missing").as_deref(), Some(""));
        assert_eq!(section_value(None, "title"), None);
    }
}
