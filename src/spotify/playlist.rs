use crate::{
    spotify::SpotifyClient,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, UserProfile,
    },
};

/// Maximum number of track uris accepted per add-tracks call.
pub const ADD_TRACKS_BATCH: usize = 100;

impl SpotifyClient {
    /// Returns the Spotify user id the access token belongs to.
    pub async fn current_user_id(&self) -> Result<String, reqwest::Error> {
        let profile: UserProfile = self.get_json("/me", &[]).await?;
        Ok(profile.id)
    }

    /// Creates an empty, non-collaborative playlist for `user_id`.
    ///
    /// Not retried on `502 Bad Gateway`, since Spotify may already have created the
    /// playlist.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: String,
        description: String,
        public: bool,
    ) -> Result<CreatePlaylistResponse, reqwest::Error> {
        let url = self.url(&format!("/users/{id}/playlists", id = user_id));
        let body = CreatePlaylistRequest {
            name,
            description,
            public,
            collaborative: false,
        };

        let response = self
            .send(|| self.http().post(&url).json(&body), false)
            .await?;
        response.json::<CreatePlaylistResponse>().await
    }

    /// Appends `uris` to the playlist in batches of [`ADD_TRACKS_BATCH`] and returns
    /// the snapshot id of the last batch.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<Option<String>, reqwest::Error> {
        let url = self.url(&format!("/playlists/{id}/tracks", id = playlist_id));
        let mut snapshot_id = None;

        for chunk in uris.chunks(ADD_TRACKS_BATCH) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let response = self
                .send(|| self.http().post(&url).json(&body), false)
                .await?;
            let res = response.json::<AddTrackToPlaylistResponse>().await?;
            snapshot_id = Some(res.snapshot_id);
        }

        Ok(snapshot_id)
    }
}
