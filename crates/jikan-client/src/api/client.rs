//! Jikan API v4 catalog client.
//!
//! One method per logical resource. Each builds a request descriptor,
//! enqueues it on the shared [`Governor`] immediately, and returns a future
//! resolving to the decoded [`Envelope`].

use super::error::ApiError;
use super::governor::{Governor, GovernorConfig, PendingResponse};
use super::request::RequestDescriptor;
use super::transport::{HttpTransport, Transport};
use super::types::Envelope;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Decoded envelope of an already-enqueued request
#[must_use = "the response is only observable by awaiting it"]
pub struct PendingEnvelope {
    inner: PendingResponse,
}

impl Future for PendingEnvelope {
    type Output = Result<Envelope, ApiError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner)
            .poll(cx)
            .map(|settled| settled.and_then(Envelope::from_value))
    }
}

/// Outcomes of the calls issued when opening an anime detail view.
///
/// Each part fails independently.
#[derive(Debug)]
pub struct AnimeDetailBundle {
    pub full: Result<Envelope, ApiError>,
    pub characters: Result<Envelope, ApiError>,
    pub videos: Result<Envelope, ApiError>,
    pub statistics: Result<Envelope, ApiError>,
    pub recommendations: Result<Envelope, ApiError>,
    pub streaming: Result<Envelope, ApiError>,
    pub themes: Result<Envelope, ApiError>,
}

/// Outcomes of the calls issued when opening a manga detail view
#[derive(Debug)]
pub struct MangaDetailBundle {
    pub full: Result<Envelope, ApiError>,
    pub characters: Result<Envelope, ApiError>,
    pub statistics: Result<Envelope, ApiError>,
    pub recommendations: Result<Envelope, ApiError>,
}

/// Outcomes of the calls issued when opening a character detail view
#[derive(Debug)]
pub struct CharacterDetailBundle {
    pub full: Result<Envelope, ApiError>,
    pub anime: Result<Envelope, ApiError>,
    pub manga: Result<Envelope, ApiError>,
    pub voices: Result<Envelope, ApiError>,
}

/// Random entity kinds served by `/random/{kind}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomKind {
    Anime,
    Manga,
    Character,
    Person,
}

impl RandomKind {
    pub fn as_str(&self) -> &str {
        match self {
            RandomKind::Anime => "anime",
            RandomKind::Manga => "manga",
            RandomKind::Character => "characters",
            RandomKind::Person => "people",
        }
    }
}

/// Jikan API v4 client
#[derive(Clone)]
pub struct JikanClient {
    governor: Governor,
}

impl JikanClient {
    /// Create a client on top of an existing governor
    pub fn new(governor: Governor) -> Self {
        Self { governor }
    }

    /// Create a client with its own governor over the given transport
    pub fn with_transport(transport: Arc<dyn Transport>, config: GovernorConfig) -> Self {
        Self::new(Governor::spawn(transport, config))
    }

    /// Create an HTTP-backed client from the `[jikan]` config section
    pub fn from_config(config: &shared::JikanConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            GovernorConfig::from_config(config),
        ))
    }

    pub fn governor(&self) -> &Governor {
        &self.governor
    }

    /// Enqueue an arbitrary request
    pub fn fetch(&self, request: RequestDescriptor) -> PendingEnvelope {
        PendingEnvelope {
            inner: self.governor.enqueue(request),
        }
    }

    fn get(&self, path: impl Into<String>) -> PendingEnvelope {
        self.fetch(RequestDescriptor::new(path))
    }

    // Anime

    pub fn top_anime(&self, page: u32, filter: Option<&str>) -> PendingEnvelope {
        self.fetch(
            RequestDescriptor::new("/top/anime")
                .param("page", page)
                .param_opt("filter", filter.filter(|f| !f.is_empty())),
        )
    }

    pub fn seasonal_anime(&self, page: u32) -> PendingEnvelope {
        self.fetch(RequestDescriptor::new("/seasons/now").param("page", page))
    }

    pub fn search_anime(&self, query: &str, page: u32) -> PendingEnvelope {
        self.fetch(
            RequestDescriptor::new("/anime")
                .param("q", query)
                .param("page", page)
                .param("sfw", true),
        )
    }

    pub fn anime(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}", id))
    }

    pub fn anime_full(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/full", id))
    }

    pub fn anime_characters(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/characters", id))
    }

    pub fn anime_staff(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/staff", id))
    }

    pub fn anime_episodes(&self, id: u32, page: u32) -> PendingEnvelope {
        self.fetch(RequestDescriptor::new(format!("/anime/{}/%s", id)).param("page", page))
    }

    pub fn anime_episode(&self, id: u32, episode: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/episodes/{}", id, episode))
    }

    pub fn anime_news(&self, id: u32, page: u32) -> PendingEnvelope {
        self.fetch(RequestDescriptor::new(format!("/anime/{}/%s", id)).param("page", page))
    }

    pub fn anime_videos(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/videos", id))
    }

    pub fn anime_pictures(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/pictures", id))
    }

    pub fn anime_statistics(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/statistics", id))
    }

    pub fn anime_recommendations(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/recommendations", id))
    }

    pub fn anime_reviews(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/reviews", id))
    }

    pub fn anime_streaming(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/streaming", id))
    }

    pub fn anime_themes(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/anime/{}/themes", id))
    }

    /// Fire every call an anime detail view needs and wait for all of them.
    ///
    /// The requests are enqueued back-to-back, so they are dispatched in the
    /// order of the bundle's fields.
    pub async fn anime_detail_bundle(&self, id: u32) -> AnimeDetailBundle {
        let (full, characters, videos, statistics, recommendations, streaming, themes) =
            tokio::join!(
                self.anime_full(id),
                self.anime_characters(id),
                self.anime_videos(id),
                self.anime_statistics(id),
                self.anime_recommendations(id),
                self.anime_streaming(id),
                self.anime_themes(id),
            );

        AnimeDetailBundle {
            full,
            characters,
            videos,
            statistics,
            recommendations,
            streaming,
            themes,
        }
    }

    // Manga

    pub fn top_manga(&self, page: u32, limit: u32) -> PendingEnvelope {
        self.fetch(
            RequestDescriptor::new("/top/manga")
                .param("page", page)
                .param("limit", limit)
                .param("sfw", true),
        )
    }

    pub fn search_manga(&self, query: &str, page: u32, limit: u32) -> PendingEnvelope {
        self.fetch(
            RequestDescriptor::new("/manga")
                .param("q", query)
                .param("page", page)
                .param("limit", limit)
                .param("sfw", true)
                .param("order_by", "score")
                .param("sort", "desc"),
        )
    }

    pub fn manga_full(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/manga/{}/full", id))
    }

    pub fn manga_characters(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/manga/{}/characters", id))
    }

    pub fn manga_news(&self, id: u32, page: u32) -> PendingEnvelope {
        self.fetch(
            RequestDescriptor::new(format!("/manga/{}/news", id)).param("page", page),
        )
    }

    pub fn manga_pictures(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/manga/{}/pictures", id))
    }

    pub fn manga_statistics(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/manga/{}/statistics", id))
    }

    pub fn manga_recommendations(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/manga/{}/recommendations", id))
    }

    pub fn manga_genres(&self) -> PendingEnvelope {
        self.get("/genres/manga")
    }

    /// Fire the calls a manga detail view needs, in field order
    pub async fn manga_detail_bundle(&self, id: u32) -> MangaDetailBundle {
        let (full, characters, statistics, recommendations) = tokio::join!(
            self.manga_full(id),
            self.manga_characters(id),
            self.manga_statistics(id),
            self.manga_recommendations(id),
        );

        MangaDetailBundle {
            full,
            characters,
            statistics,
            recommendations,
        }
    }

    // Characters

    pub fn top_characters(&self, page: u32, limit: u32) -> PendingEnvelope {
        self.fetch(
            RequestDescriptor::new("/top/characters")
                .param("page", page)
                .param("limit", limit),
        )
    }

    pub fn search_characters(&self, query: &str, page: u32, limit: u32) -> PendingEnvelope {
        self.fetch(
            RequestDescriptor::new("/characters")
                .param("q", query)
                .param("page", page)
                .param("limit", limit)
                .param("order_by", "favorites")
                .param("sort", "desc"),
        )
    }

    pub fn character_full(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/characters/{}/full", id))
    }

    pub fn character_anime(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/characters/{}/anime", id))
    }

    pub fn character_manga(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/characters/{}/manga", id))
    }

    pub fn character_voices(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/characters/{}/voices", id))
    }

    pub fn character_pictures(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/characters/{}/pictures", id))
    }

    /// Fire the calls a character detail view needs, in field order
    pub async fn character_detail_bundle(&self, id: u32) -> CharacterDetailBundle {
        let (full, anime, manga, voices) = tokio::join!(
            self.character_full(id),
            self.character_anime(id),
            self.character_manga(id),
            self.character_voices(id),
        );

        CharacterDetailBundle {
            full,
            anime,
            manga,
            voices,
        }
    }

    // People

    pub fn top_people(&self, page: u32) -> PendingEnvelope {
        self.fetch(RequestDescriptor::new("/top/people").param("page", page))
    }

    pub fn search_people(&self, query: &str, page: u32) -> PendingEnvelope {
        self.fetch(
            RequestDescriptor::new("/people")
                .param("q", query)
                .param("page", page),
        )
    }

    pub fn person_full(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/people/{}/full", id))
    }

    pub fn person_anime(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/people/{}/anime", id))
    }

    pub fn person_manga(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/people/{}/manga", id))
    }

    pub fn person_voices(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/people/{}/voices", id))
    }

    pub fn person_pictures(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/people/{}/pictures", id))
    }

    // Producers / studios

    pub fn producers(&self, page: u32) -> PendingEnvelope {
        self.fetch(RequestDescriptor::new("/producers").param("page", page))
    }

    pub fn producer_full(&self, id: u32) -> PendingEnvelope {
        self.get(format!("/producers/{}/full", id))
    }

    // Genres

    pub fn anime_genres(&self) -> PendingEnvelope {
        self.get("/genres/anime")
    }

    // Random

    pub fn random(&self, kind: RandomKind) -> PendingEnvelope {
        self.get(format!("/random/{}", kind.as_str()))
    }

    pub fn random_anime(&self) -> PendingEnvelope {
        self.random(RandomKind::Anime)
    }

    pub fn random_manga(&self) -> PendingEnvelope {
        self.random(RandomKind::Manga)
    }

    pub fn random_character(&self) -> PendingEnvelope {
        self.random(RandomKind::Character)
    }

    pub fn random_person(&self) -> PendingEnvelope {
        self.random(RandomKind::Person)
    }
}
