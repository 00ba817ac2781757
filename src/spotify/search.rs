use crate::{
    spotify::SpotifyClient,
    types::{SearchResponse, Track},
};

impl SpotifyClient {
    /// Searches the catalog for a track and returns the best match, if any.
    ///
    /// `query` uses the Spotify search syntax, e.g. `track:Heroes artist:Bowie`.
    /// Plain text works as well.
    pub async fn search_track(&self, query: &str) -> Result<Option<Track>, reqwest::Error> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("type".to_string(), "track".to_string()),
            ("limit".to_string(), "1".to_string()),
        ];

        let res: SearchResponse = self.get_json("/search", &params).await?;
        Ok(res.tracks.items.into_iter().next())
    }
}
