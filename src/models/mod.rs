use crate::catalog::Lookup;

/// Discriminates which detail-page branch renders a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Track,
    Editorial,
    EditorialDetail,
    Album,
    Artist,
    Playlist,
    Genre,
    Radio,
    Episode,
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Track => "track",
            ResourceKind::Editorial => "editorial",
            ResourceKind::EditorialDetail => "editorial_detail",
            ResourceKind::Album => "album",
            ResourceKind::Artist => "artist",
            ResourceKind::Playlist => "playlist",
            ResourceKind::Genre => "genre",
            ResourceKind::Radio => "radio",
            ResourceKind::Episode => "episode",
        }
    }
}

/// Everything a detail page needs: the payload (or its absence), a page
/// title, the branch discriminator and handler-specific extras.
#[derive(Debug)]
pub struct DetailContext {
    pub payload: Lookup,
    pub title: String,
    pub kind: ResourceKind,
    /// Secondary payload, artist pages only.
    pub top_tracks: Option<Lookup>,
    /// Editorial detail pages carry the id they were resolved from.
    pub editorial_id: Option<String>,
}

impl DetailContext {
    pub fn new(payload: Lookup, title: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            payload,
            title: title.into(),
            kind,
            top_tracks: None,
            editorial_id: None,
        }
    }

    pub fn with_top_tracks(mut self, top_tracks: Lookup) -> Self {
        self.top_tracks = Some(top_tracks);
        self
    }

    pub fn with_editorial_id(mut self, id: impl Into<String>) -> Self {
        self.editorial_id = Some(id.into());
        self
    }
}

#[derive(Debug)]
pub struct SearchContext {
    pub results: Lookup,
    pub query: String,
    pub search_type: String,
}

#[derive(Debug)]
pub struct HomeContext {
    pub chart: Lookup,
    pub editorial: Lookup,
}
