//! Assembly of the `cei:text` tree of a charter.
//!
//! The layout follows the CEI schema order: `front`, `body` and `back` are
//! always present, every other container only when it has content.

use super::{Charter, Seals};
use crate::assembler::{add_schema_location, XmlAssembler};
use crate::config::WITNESS_TYPE;
use crate::date::encode_date;
use crate::fields::TextOrElement;
use crate::xml::Element;

fn bibls(entries: &[String]) -> impl Iterator<Item = Option<Element>> + '_ {
    entries
        .iter()
        .map(|entry| Some(Element::cei("bibl").with_text(entry.as_str())))
}

fn text_elements<'a>(
    tag: &'a str,
    entries: &'a [String],
) -> impl Iterator<Item = Option<Element>> + 'a {
    entries
        .iter()
        .map(move |entry| Some(Element::cei(tag).with_text(entry.as_str())))
}

fn optional_text(tag: &str, value: Option<&str>) -> Option<Element> {
    value.map(|text| Element::cei(tag).with_text(text))
}

fn index_entries(entries: &[TextOrElement], tag: &str) -> Vec<Element> {
    entries.iter().map(|entry| entry.to_cei(tag)).collect()
}

impl Charter {
    pub(super) fn build(&self, schema_location: bool) -> Element {
        let text = Element::cei("text")
            .with_attr("type", "charter")
            .with_child(self.front())
            .with_child(self.body())
            .with_child(self.back());
        if schema_location {
            add_schema_location(text)
        } else {
            text
        }
    }

    fn front(&self) -> Element {
        let regest = Element::cei_composite("sourceDescRegest", bibls(&self.abstract_sources));
        let volltext =
            Element::cei_composite("sourceDescVolltext", bibls(&self.transcription_sources));
        Element::cei("front").with_children(Element::cei_composite("sourceDesc", [regest, volltext]))
    }

    fn body(&self) -> Element {
        Element::cei("body")
            .with_child(self.idno())
            .with_children(self.ch_desc())
            .with_children(
                self.transcription
                    .as_ref()
                    .map(|tenor| tenor.to_cei("tenor")),
            )
    }

    fn idno(&self) -> Element {
        let mut idno = Element::cei("idno").with_attr("id", self.id_norm());
        if let Some(old) = &self.id_old {
            idno.set_attr("old", old.as_str());
        }
        idno.with_text(self.id_text.as_str())
    }

    fn ch_desc(&self) -> Option<Element> {
        Element::cei_composite(
            "chDesc",
            [
                self.abstract_element(),
                Some(self.issued()),
                self.witness_orig(),
                self.diplomatic_analysis(),
                optional_text("lang_MOM", self.language.as_deref()),
            ],
        )
    }

    /// Recipient first, then issuers, nested into a text abstract. Without
    /// an abstract text the parties still get an abstract of their own.
    fn abstract_element(&self) -> Option<Element> {
        let parties: Vec<Element> = self
            .recipient
            .iter()
            .map(|recipient| recipient.to_cei("recipient"))
            .chain(self.issuers.iter().map(|issuer| issuer.to_cei("issuer")))
            .collect();

        match &self.r#abstract {
            Some(TextOrElement::Element(element)) => Some(element.clone()),
            Some(TextOrElement::Text(text)) => Some(
                Element::cei("abstract")
                    .with_text(text.as_str())
                    .with_children(parties),
            ),
            None => Element::cei_composite("abstract", parties.into_iter().map(Some)),
        }
    }

    fn issued(&self) -> Element {
        let date = match &self.date {
            Some(TextOrElement::Element(element)) => element.clone(),
            Some(TextOrElement::Text(text)) => encode_date(self.date_value.as_ref(), Some(text.as_str())),
            None => encode_date(self.date_value.as_ref(), None),
        };
        Element::cei("issued")
            .with_children(
                self.issued_place
                    .as_ref()
                    .map(|place| place.to_cei("placeName")),
            )
            .with_child(date)
    }

    fn witness_orig(&self) -> Option<Element> {
        let arch_identifier = Element::cei_composite(
            "archIdentifier",
            [
                optional_text("arch", self.archive.as_deref()),
                self.external_link
                    .as_deref()
                    .map(|link| Element::cei("ref").with_attr("target", link)),
            ],
        );
        let auth = Element::cei_composite(
            "auth",
            [
                self.notarial_authentication
                    .as_ref()
                    .map(|auth| auth.to_cei("notariusDesc")),
                self.seal_desc(),
            ],
        );
        let physical_desc = Element::cei_composite(
            "physicalDesc",
            [
                optional_text("material", self.material.as_deref()),
                optional_text("dimensions", self.dimensions.as_deref()),
                optional_text("condition", self.condition.as_deref()),
            ],
        );
        let figures = self.graphic_urls.iter().map(|url| {
            Some(
                Element::cei("figure")
                    .with_child(Element::cei("graphic").with_attr("url", url.as_str())),
            )
        });

        let children = [
            optional_text("traditioForm", self.tradition.as_deref()),
            arch_identifier,
            auth,
            physical_desc,
        ]
        .into_iter()
        .chain(text_elements("nota", &self.chancellary_remarks))
        .chain(figures);

        Element::cei_composite("witnessOrig", children)
    }

    fn seal_desc(&self) -> Option<Element> {
        match self.seals.as_ref()? {
            Seals::Element(element) => Some(element.clone()),
            Seals::Text(text) => Some(Element::cei("sealDesc").with_text(text.as_str())),
            Seals::Texts(texts) => Element::cei_composite("sealDesc", text_elements("seal", texts)),
            Seals::Seal(seal) => seal
                .assemble(false)
                .map(|seal| Element::cei("sealDesc").with_child(seal)),
            Seals::Seals(seals) => {
                Element::cei_composite("sealDesc", seals.iter().map(|seal| seal.assemble(false)))
            }
        }
    }

    fn diplomatic_analysis(&self) -> Option<Element> {
        let children = [
            Element::cei_composite("listBibl", bibls(&self.literature)),
            Element::cei_composite("listBiblEdition", bibls(&self.literature_editions)),
            Element::cei_composite("listBiblRegest", bibls(&self.literature_abstracts)),
            Element::cei_composite("listBiblFaksimile", bibls(&self.literature_depictions)),
            Element::cei_composite("listBiblErw", bibls(&self.literature_secondary)),
            self.date_quote
                .as_ref()
                .map(|quote| quote.to_cei("quoteOriginaldatierung")),
        ]
        .into_iter()
        .chain(text_elements("p", &self.comments));

        Element::cei_composite("diplomaticAnalysis", children)
    }

    fn back(&self) -> Element {
        let witnesses = self.witnesses.iter().map(|witness| {
            let mut person = witness.to_cei("persName");
            person.set_attr("type", WITNESS_TYPE);
            person
        });
        let notes = Element::cei_composite("divNotes", text_elements("note", &self.footnotes));

        Element::cei("back")
            .with_children(witnesses)
            .with_children(index_entries(&self.index_persons, "persName"))
            .with_children(index_entries(&self.index_organizations, "orgName"))
            .with_children(index_entries(&self.index_places, "placeName"))
            .with_children(index_entries(&self.index_geo_features, "geogName"))
            .with_children(index_entries(&self.index, "index"))
            .with_children(notes)
    }
}
