//! Feature table reading shared by the `FT` block and the `FEATURES` block.
//!
//! Every line's content has the feature key in its first 16 columns and the
//! location or qualifier text after that. A non-blank key starts a feature;
//! following lines continue the location until a line whose text starts
//! with `/`, outside an open quoted value, starts a qualifier.

use flatseq_core::{codes, Diagnostics, Origin};
use flatseq_record::{CompoundLocation, Feature, LocationParser, LocationText, QualifierAssembler};

use crate::block::{column_prefix, column_slice};

/// Width of the key columns within a feature line's content.
pub const KEY_WIDTH: usize = 16;

struct PendingFeature {
    name: String,
    first_line: u32,
    last_line: u32,
    location: LocationText,
    qualifiers: Vec<QualifierAssembler>,
}

impl PendingFeature {
    fn in_quotes(&self) -> bool {
        self.qualifiers.last().is_some_and(QualifierAssembler::in_quotes)
    }

    fn finish(self, diagnostics: &mut Diagnostics) -> Feature {
        let location_origin = if self.location.is_empty() {
            Origin::line(self.first_line)
        } else {
            self.location.origin()
        };
        let locations = match LocationParser::new().parse(&self.location) {
            Ok(locations) => locations,
            Err(e) => {
                diagnostics.error(
                    codes::INVALID_LOCATION,
                    location_origin,
                    format!(
                        "Invalid location '{}' of feature {}: {}",
                        self.location.as_str(),
                        self.name,
                        e
                    ),
                );
                CompoundLocation::empty(location_origin)
            }
        };
        let qualifiers = self
            .qualifiers
            .into_iter()
            .filter_map(|q| q.finish(diagnostics))
            .collect();
        Feature {
            name: self.name,
            locations,
            qualifiers,
            origin: Origin::new(self.first_line, self.last_line),
        }
    }
}

/// Decode feature table lines given as `(line number, content)` pairs.
pub fn read_feature_table<'a>(
    lines: impl IntoIterator<Item = (u32, &'a str)>,
    diagnostics: &mut Diagnostics,
) -> Vec<Feature> {
    let mut features = Vec::new();
    let mut current: Option<PendingFeature> = None;

    for (number, content) in lines {
        if content.trim().is_empty() {
            continue;
        }
        let mut key = column_prefix(content, KEY_WIDTH).trim();
        let mut text = column_slice(content, KEY_WIDTH);

        if !key.is_empty() {
            if content.chars().nth(KEY_WIDTH - 1).is_some_and(|c| !c.is_whitespace()) {
                // Key runs into the location column.
                diagnostics.error(
                    codes::INVALID_FEATURE_LINE,
                    Origin::line(number),
                    format!("Feature key overruns column {}", KEY_WIDTH + 5),
                );
                let trimmed = content.trim_start();
                let split = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
                key = &trimmed[..split];
                text = &trimmed[split..];
            }
            if let Some(done) = current.take() {
                features.push(done.finish(diagnostics));
            }
            let mut location = LocationText::new();
            if !text.trim().is_empty() {
                location.push_line(number, text);
            }
            current = Some(PendingFeature {
                name: key.to_string(),
                first_line: number,
                last_line: number,
                location,
                qualifiers: Vec::new(),
            });
            continue;
        }

        let Some(feature) = current.as_mut() else {
            diagnostics.warning(
                codes::ORPHAN_QUALIFIER_LINE,
                Origin::line(number),
                "Feature table line does not belong to any feature",
            );
            continue;
        };
        feature.last_line = number;

        if feature.in_quotes() {
            if let Some(q) = feature.qualifiers.last_mut() {
                q.push_line(number, text);
            }
        } else if text.starts_with('/') {
            feature.qualifiers.push(QualifierAssembler::new(number, text));
        } else if let Some(q) = feature.qualifiers.last_mut() {
            q.push_line(number, text);
        } else {
            feature.location.push_line(number, text);
        }
    }

    if let Some(done) = current {
        features.push(done.finish(diagnostics));
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatseq_record::LocationKind;

    fn table(lines: &[&str]) -> (Vec<Feature>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let features = read_feature_table(
            lines.iter().enumerate().map(|(i, l)| (i as u32 + 1, *l)),
            &mut diagnostics,
        );
        (features, diagnostics)
    }

    #[test]
    fn feature_and_qualifier_origins() {
        let (features, d) = table(&[
            "CDS             join(1..10,",
            "                20..30)",
            "                /note=\"a long",
            "                note\"",
            "                /gene=\"abc\"",
            "                /pseudo",
            "                /codon_start=1",
        ]);
        assert!(d.is_empty(), "{d:?}");
        assert_eq!(features.len(), 1);
        let cds = &features[0];
        assert_eq!(cds.name, "CDS");
        assert_eq!(cds.origin, Origin::new(1, 7));
        assert_eq!(cds.locations.origin, Origin::new(1, 2));
        assert_eq!(cds.locations.locations[0].origin, Origin::line(1));
        assert_eq!(cds.locations.locations[1].origin, Origin::line(2));
        let origins: Vec<Origin> = cds.qualifiers.iter().map(|q| q.origin).collect();
        assert_eq!(
            origins,
            [Origin::new(3, 4), Origin::line(5), Origin::line(6), Origin::line(7)]
        );
        assert_eq!(cds.qualifier_value("note"), Some("a long note"));
        assert_eq!(cds.qualifier_value("codon_start"), Some("1"));
    }

    #[test]
    fn several_features() {
        let (features, _) = table(&[
            "source          1..1859",
            "                /organism=\"Kluyveromyces lactis\"",
            "mRNA            <1..>1859",
            "CDS             14..1495",
            "                /translation=\"MSFSKKIL",
            "                LLGLL\"",
        ]);
        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["source", "mRNA", "CDS"]);
        assert!(features[1].locations.left_partial);
        assert!(features[1].locations.right_partial);
        assert_eq!(features[2].qualifier_value("translation"), Some("MSFSKKILLLGLL"));
        assert_eq!(
            features[2].locations.locations[0].kind,
            LocationKind::LocalRange { begin: 14, end: 1495 }
        );
    }

    #[test]
    fn slash_inside_quotes_continues_value() {
        let (features, _) = table(&[
            "misc_feature    5..9",
            "                /note=\"first",
            "                /not_a_qualifier\"",
        ]);
        assert_eq!(features[0].qualifiers.len(), 1);
        assert_eq!(features[0].qualifier_value("note"), Some("first /not_a_qualifier"));
    }

    #[test]
    fn stray_quote_in_unquoted_value_ends_at_next_qualifier() {
        let (features, d) = table(&[
            "misc_feature    5..9",
            "                /note=5'UTR 3\"end",
            "                /gene=\"abc\"",
            "                /locus_tag=\"T1\"",
        ]);
        assert!(d.is_empty(), "{d:?}");
        let feature = &features[0];
        assert_eq!(feature.qualifiers.len(), 3);
        assert_eq!(feature.qualifier_value("note"), Some("5'UTR 3\"end"));
        assert_eq!(feature.qualifier_value("gene"), Some("abc"));
        assert_eq!(feature.qualifier_value("locus_tag"), Some("T1"));
        assert_eq!(feature.qualifiers[0].origin, Origin::line(2));
    }

    #[test]
    fn bad_location_keeps_feature() {
        let (features, d) = table(&[
            "gene            join(1..10,",
            "                oops)",
            "                /gene=\"x\"",
        ]);
        assert_eq!(features.len(), 1);
        assert!(features[0].locations.is_empty());
        assert_eq!(features[0].locations.origin, Origin::new(1, 2));
        assert_eq!(features[0].qualifier_value("gene"), Some("x"));
        let diag = d.with_code(codes::INVALID_LOCATION).next().unwrap();
        assert_eq!(diag.origin, Origin::new(1, 2));
    }

    #[test]
    fn orphan_line_warns() {
        let (features, d) = table(&["                /note=\"x\"", "gene            1..2"]);
        assert_eq!(features.len(), 1);
        assert_eq!(d.with_code(codes::ORPHAN_QUALIFIER_LINE).count(), 1);
    }

    #[test]
    fn overlong_key() {
        let (features, d) = table(&["misc_recombination 1..5"]);
        assert_eq!(features[0].name, "misc_recombination");
        assert_eq!(features[0].locations.to_string(), "1..5");
        assert_eq!(d.with_code(codes::INVALID_FEATURE_LINE).count(), 1);
    }
}
