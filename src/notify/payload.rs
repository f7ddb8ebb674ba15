use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Characteristics, RawAd};

/// Fixed embed color of every notification.
pub const EMBED_COLOR: i64 = 1_048_302;

/// Fixed-schema message delivered to the notification sink.
///
/// Built once per passing listing, immutable after construction. The field
/// set is the wire contract; nothing is conditionally omitted, and sentinel
/// values render literally as `undefined` in the description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub content: String,
    pub tts: bool,
    pub embeds: Vec<Embed>,
    pub components: Vec<serde_json::Value>,
    pub actions: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embed {
    pub description: String,
    pub fields: Vec<serde_json::Value>,
    pub author: EmbedAuthor,
    pub title: String,
    pub color: i64,
    pub image: EmbedImage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedImage {
    pub url: String,
}

impl NotificationPayload {
    /// Deterministic template substitution from the ad and its extracted
    /// characteristics.
    pub fn build(ad: &RawAd, carac: &Characteristics) -> Self {
        let description = format!(
            "**{nb_room} pièce(s)** au total\r\n\
             **{bedrooms} chambre(s)** à louer\r\n\
             **Nombre de garcons: {nb_male}** // **Nombre de filles: {nb_female}**\r\n\
             Disponibilité de l'appartement: {rent_date}\r\n\
             Localisation: **{apart_loc}**",
            nb_room = carac.nb_room,
            bedrooms = carac.bedrooms_to_rent,
            nb_male = or_undefined(&carac.nb_male),
            nb_female = or_undefined(&carac.nb_female),
            rent_date = or_undefined(&carac.rent_date),
            apart_loc = or_undefined(&carac.apart_loc),
        );

        Self {
            content: String::new(),
            tts: false,
            embeds: vec![Embed {
                description,
                fields: Vec::new(),
                author: EmbedAuthor {
                    name: ad.price.clone(),
                },
                title: ad.title.clone(),
                color: EMBED_COLOR,
                image: EmbedImage {
                    url: ad.image.clone().unwrap_or_default(),
                },
            }],
            components: Vec::new(),
            actions: serde_json::Map::new(),
        }
    }
}

fn or_undefined<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "undefined".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ad() -> RawAd {
        RawAd {
            id_text: "3 room apartment, 2 bedrooms available".to_string(),
            title: "Room for rent".to_string(),
            price: "500€".to_string(),
            image: Some("http://x/img.png".to_string()),
            text: "3 room apartment, 2 bedrooms available".to_string(),
            link: None,
        }
    }

    #[test]
    fn substitutes_characteristics_into_the_template() {
        let carac = Characteristics {
            nb_room: 3,
            bedrooms_to_rent: 2,
            rent_date: Some("2025-01-17".to_string()),
            ..Default::default()
        };
        let payload = NotificationPayload::build(&sample_ad(), &carac);
        let embed = &payload.embeds[0];
        assert!(embed.description.contains("3 pièce(s)"));
        assert!(embed.description.contains("2 chambre(s)"));
        assert!(embed.description.contains("2025-01-17"));
        assert_eq!(embed.title, "Room for rent");
        assert_eq!(embed.author.name, "500€");
        assert_eq!(embed.image.url, "http://x/img.png");
        assert_eq!(embed.color, EMBED_COLOR);
    }

    #[test]
    fn sentinels_render_literally() {
        let carac = Characteristics {
            bedrooms_to_rent: 2,
            ..Default::default()
        };
        let payload = NotificationPayload::build(&sample_ad(), &carac);
        let description = &payload.embeds[0].description;
        assert!(description.contains("Nombre de garcons: undefined"));
        assert!(description.contains("Nombre de filles: undefined"));
        assert!(description.contains("Disponibilité de l'appartement: undefined"));
        assert!(description.contains("Localisation: **undefined**"));
    }

    #[test]
    fn wire_schema_has_the_exact_keys() {
        let payload = NotificationPayload::build(&sample_ad(), &Characteristics::default());
        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["actions", "components", "content", "embeds", "tts"]);

        let embed = value["embeds"][0].as_object().unwrap();
        let mut embed_keys: Vec<&str> = embed.keys().map(String::as_str).collect();
        embed_keys.sort_unstable();
        assert_eq!(
            embed_keys,
            ["author", "color", "description", "fields", "image", "title"]
        );
        assert_eq!(value["embeds"][0]["author"]["name"], "500€");
        assert_eq!(value["tts"], false);
        assert_eq!(value["components"], serde_json::json!([]));
        assert_eq!(value["actions"], serde_json::json!({}));
    }

    #[test]
    fn missing_image_renders_as_empty_url() {
        let mut ad = sample_ad();
        ad.image = None;
        let payload = NotificationPayload::build(&ad, &Characteristics::default());
        assert_eq!(payload.embeds[0].image.url, "");
    }
}
