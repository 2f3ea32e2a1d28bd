use crate::dom::{Document, ElementId, Selector};
use crate::error::AppResult;
use crate::event::{Key, UiEvent};
use crate::site::{Feature, Handled, PageContext};

use super::lightbox::LightboxImage;

/// Images that open in the lightbox.
pub fn gallery_images() -> Selector {
    Selector::any([
        Selector::tag("img").within(Selector::class("pet-card")),
        Selector::tag("img").within(Selector::class("blog-card")),
    ])
}

/// Current gallery images in document order.
pub fn collect_images(doc: &dyn Document) -> Vec<(ElementId, LightboxImage)> {
    doc.query_all(&gallery_images())
        .into_iter()
        .map(|id| {
            let image = LightboxImage::new(
                doc.attr(id, "src").unwrap_or_default(),
                doc.attr(id, "alt").unwrap_or_default(),
            );
            (id, image)
        })
        .collect()
}

/// Opens card images in the lightbox.
pub struct Gallery;

impl Feature for Gallery {
    type State = ();

    const NAME: &'static str = "gallery";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let images = ctx.doc.query_all(&gallery_images());
        if images.is_empty() {
            return Ok(());
        }
        for image in images {
            ctx.doc.set_attr(image, "tabindex", "0");
            ctx.doc.set_attr(image, "role", "button");
        }
        ctx.overlays.prepare_lightbox(ctx.doc);
        Ok(())
    }

    fn handle_ui(
        _state: &mut Self::State,
        event: &UiEvent,
        ctx: &mut PageContext<'_>,
    ) -> AppResult<Handled> {
        let target = match event {
            UiEvent::Click { target } => *target,
            UiEvent::KeyDown {
                target: Some(target),
                key: Key::Enter | Key::Space,
            } => *target,
            _ => return Ok(Handled::Ignored),
        };
        if !ctx.doc.matches(target, &gallery_images()) {
            return Ok(Handled::Ignored);
        }

        // Collected now so images added after load are included.
        let (ids, images): (Vec<ElementId>, Vec<LightboxImage>) =
            collect_images(ctx.doc).into_iter().unzip();
        let Some(index) = ids.iter().position(|id| *id == target) else {
            return Ok(Handled::Ignored);
        };
        if ctx.overlays.open_lightbox(ctx.doc, images, index as isize) {
            ctx.track("lightbox", "opened")?;
        }
        Ok(Handled::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::Gallery;
    use crate::dom::{Document, ElementId, ElementSpec, MemoryDocument, Selector};
    use crate::event::{Key, UiEvent};
    use crate::overlay::OverlayKind;
    use crate::site::test_support::Harness;
    use crate::site::{Feature, Handled};

    fn pet_images(doc: &mut MemoryDocument) -> Vec<ElementId> {
        let body = doc.body();
        ["joe", "grace", "asher"]
            .into_iter()
            .map(|name| {
                let card = doc
                    .append_child(body, ElementSpec::new("div").class("pet-card"))
                    .expect("body exists");
                doc.append_child(
                    card,
                    ElementSpec::new("img")
                        .attr("src", format!("{name}.jpg"))
                        .attr("alt", name),
                )
                .expect("card exists")
            })
            .collect()
    }

    #[test]
    fn mount_prepares_a_single_lightbox() {
        let mut harness = Harness::new("/pets.html");
        let images = pet_images(&mut harness.doc);
        Gallery::mount(&mut harness.ctx()).expect("gallery mounts");
        Gallery::mount(&mut harness.ctx()).expect("gallery mounts again");

        assert_eq!(harness.doc.query_all(&Selector::id("lightbox")).len(), 1);
        assert_eq!(harness.doc.attr(images[0], "tabindex").as_deref(), Some("0"));
    }

    #[test]
    fn activating_an_image_opens_it_and_consumes_the_click() {
        let mut harness = Harness::new("/pets.html");
        let images = pet_images(&mut harness.doc);
        let mut state = Gallery::mount(&mut harness.ctx()).expect("gallery mounts");

        let click = UiEvent::Click { target: images[1] };
        let handled = Gallery::handle_ui(&mut state, &click, &mut harness.ctx()).expect("click");
        assert_eq!(handled, Handled::Consumed);
        assert_eq!(harness.overlays.active(), Some(OverlayKind::Lightbox));
        assert_eq!(harness.overlays.lightbox().current_index(), 1);
        assert_eq!(
            harness.tracked(),
            vec![("lightbox".to_string(), "opened".to_string())]
        );

        harness.overlays.close_lightbox(&mut harness.doc);
        let enter = UiEvent::KeyDown {
            target: Some(images[2]),
            key: Key::Enter,
        };
        Gallery::handle_ui(&mut state, &enter, &mut harness.ctx()).expect("enter");
        assert_eq!(
            harness.overlays.lightbox().current().map(|image| image.alt.as_str()),
            Some("asher")
        );
    }

    #[test]
    fn pages_without_card_images_stay_untouched() {
        let mut harness = Harness::new("/index.html");
        Gallery::mount(&mut harness.ctx()).expect("gallery mounts");
        assert!(harness.doc.query(&Selector::id("lightbox")).is_none());
    }
}
