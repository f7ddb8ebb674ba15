use serde::{Deserialize, Serialize};

/// A single unprocessed listing as handed over by the feed source.
///
/// Immutable once collected. `id_text` carries the free-text body that the
/// dedup fingerprint is computed from; two ads with byte-identical text are
/// treated as the same listing even if title or price differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAd {
    pub id_text: String,
    pub title: String,
    pub price: String,
    pub image: Option<String>,
    pub text: String,
    pub link: Option<String>,
}

/// Canonical structured record extracted from a listing's free text.
///
/// Constructed fresh for every ad via [`Characteristics::from_delta`]; it
/// never carries values over from a previously processed listing. `None`
/// means "not confidently extracted" and renders as the literal `undefined`
/// in the notification text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Characteristics {
    pub nb_room: u32,
    pub bedrooms_to_rent: u32,
    pub nb_male: Option<u32>,
    pub nb_female: Option<u32>,
    pub rent_date: Option<String>,
    pub apart_loc: Option<String>,
}

/// What one extraction reply contributes: every field optional.
///
/// Unrecognized keys in the reply are dropped at deserialization. An empty
/// object deserializes to an all-`None` delta, the explicit "no extractable
/// data" outcome.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CharacteristicsDelta {
    pub nb_room: Option<u32>,
    pub bedrooms_to_rent: Option<u32>,
    pub nb_male: Option<u32>,
    pub nb_female: Option<u32>,
    pub rent_date: Option<String>,
    pub apart_loc: Option<String>,
}

impl Characteristics {
    /// Merge a parsed delta onto a freshly defaulted record.
    ///
    /// Fields absent from the delta keep their default/sentinel value.
    pub fn from_delta(delta: CharacteristicsDelta) -> Self {
        let mut carac = Characteristics::default();
        if let Some(nb_room) = delta.nb_room {
            carac.nb_room = nb_room;
        }
        if let Some(bedrooms) = delta.bedrooms_to_rent {
            carac.bedrooms_to_rent = bedrooms;
        }
        carac.nb_male = delta.nb_male;
        carac.nb_female = delta.nb_female;
        carac.rent_date = delta.rent_date;
        carac.apart_loc = delta.apart_loc;
        carac
    }
}
