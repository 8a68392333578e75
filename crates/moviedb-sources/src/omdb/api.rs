use crate::error::{LookupError, LookupOperation};
use moviedb_models::{MediaType, Movie};
use serde::Deserialize;

/// Search envelope: `{Response:"True", Search:[...]}` or `{Response:"False", Error:...}`
#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<Movie>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Status fields of the flattened detail record
#[derive(Debug, Deserialize)]
struct OmdbStatus {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

fn is_success(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

fn join_query(base_url: &str) -> String {
    let base = base_url.trim();
    if base.contains('?') {
        format!("{}&", base.trim_end_matches('&'))
    } else {
        format!("{}?", base)
    }
}

/// `{base}?apikey=..&s=..&type=..`
pub fn search_url(base_url: &str, api_key: &str, query: &str, media_type: &MediaType) -> String {
    format!(
        "{}apikey={}&s={}&type={}",
        join_query(base_url),
        urlencoding::encode(api_key),
        urlencoding::encode(query),
        media_type.as_query_value()
    )
}

/// `{base}?apikey=..&i=..`
pub fn detail_url(base_url: &str, api_key: &str, imdb_id: &str) -> String {
    format!(
        "{}apikey={}&i={}",
        join_query(base_url),
        urlencoding::encode(api_key),
        urlencoding::encode(imdb_id)
    )
}

/// Parse a search body. Only title, year, id, type and poster are projected
/// from each hit.
pub fn parse_search_response(body: &str) -> Result<Vec<Movie>, LookupError> {
    let parsed: OmdbSearchResponse = serde_json::from_str(body).map_err(|e| {
        LookupError::transport(LookupOperation::Search, format!("invalid search response: {}", e))
    })?;

    if !is_success(&parsed.response) {
        let message = parsed
            .error
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| LookupOperation::Search.not_found_message().to_string());
        return Err(LookupError::remote(message));
    }

    Ok(parsed.search.iter().map(Movie::summary).collect())
}

/// Parse a detail body (full record, no `Search` wrapper)
pub fn parse_detail_response(body: &str) -> Result<Movie, LookupError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        LookupError::transport(LookupOperation::Detail, format!("invalid detail response: {}", e))
    })?;

    let status: OmdbStatus = serde_json::from_value(value.clone()).map_err(|e| {
        LookupError::transport(LookupOperation::Detail, format!("missing response status: {}", e))
    })?;

    if !is_success(&status.response) {
        let message = status
            .error
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| LookupOperation::Detail.not_found_message().to_string());
        return Err(LookupError::remote(message));
    }

    serde_json::from_value(value).map_err(|e| {
        LookupError::transport(LookupOperation::Detail, format!("invalid movie record: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use moviedb_models::Poster;

    const BATMAN_SEARCH: &str = r#"{
        "Search": [
            {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie",
             "Poster": "https://m.media-amazon.com/images/M/begins.jpg", "Plot": "ignored"},
            {"Title": "Batman", "Year": "1989", "imdbID": "tt0096895", "Type": "movie", "Poster": "N/A"}
        ],
        "totalResults": "2",
        "Response": "True"
    }"#;

    #[test]
    fn test_parse_search_projects_summary_fields() {
        let movies = parse_search_response(BATMAN_SEARCH).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].imdb_id, "tt0372784");
        assert_eq!(movies[0].title, "Batman Begins");
        assert_eq!(movies[0].year, "2005");
        assert_eq!(movies[1].poster, Poster::Unavailable);
        assert!(movies.iter().all(|m| m.plot.is_none() && m.actors.is_none()));
    }

    #[test]
    fn test_parse_search_keeps_unrecognized_type() {
        let body = r#"{"Search":[{"Title":"Planet Earth","Year":"2006","imdbID":"tt0795176",
            "Type":"documentary","Poster":"N/A"}],"Response":"True"}"#;
        let movies = parse_search_response(body).unwrap();
        assert_eq!(movies[0].media_type, MediaType::Other("documentary".to_string()));
    }

    #[test]
    fn test_parse_search_not_found_is_verbatim() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let err = parse_search_response(body).unwrap_err();
        assert_eq!(err, LookupError::remote("Movie not found!"));
        assert_eq!(err.to_string(), "Movie not found!");
    }

    #[test]
    fn test_parse_search_false_without_error_text() {
        let err = parse_search_response(r#"{"Response":"False"}"#).unwrap_err();
        assert_eq!(err.to_string(), "No movies found");
    }

    #[test]
    fn test_parse_search_garbage_is_transport() {
        let err = parse_search_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Failed to fetch movies");
    }

    #[test]
    fn test_parse_detail_full_record() {
        let body = r#"{
            "Title": "The Shawshank Redemption", "Year": "1994", "Rated": "R",
            "Runtime": "142 min", "Genre": "Drama", "Director": "Frank Darabont",
            "Actors": "Tim Robbins, Morgan Freeman", "Plot": "Two imprisoned men bond.",
            "Poster": "N/A", "Ratings": [{"Source": "Internet Movie Database", "Value": "9.3/10"}],
            "imdbRating": "9.3", "imdbID": "tt0111161", "Type": "movie", "Response": "True"
        }"#;
        let movie = parse_detail_response(body).unwrap();
        assert_eq!(movie.imdb_id, "tt0111161");
        assert_eq!(movie.runtime.as_deref(), Some("142 min"));
        assert_eq!(movie.imdb_rating.as_deref(), Some("9.3"));
        assert!(movie.has_details());
    }

    #[test]
    fn test_parse_detail_error_shape() {
        let err = parse_detail_response(r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect IMDb ID.");

        let err = parse_detail_response(r#"{"Response":"False"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Movie not found");
    }

    #[test]
    fn test_parse_detail_garbage_is_transport() {
        let err = parse_detail_response("not json").unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch movie details");
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url("https://www.omdbapi.com/", "abc123", "the dark knight & co", &MediaType::Movie);
        assert_eq!(
            url,
            "https://www.omdbapi.com/?apikey=abc123&s=the%20dark%20knight%20%26%20co&type=movie"
        );
    }

    #[test]
    fn test_detail_url_with_existing_query() {
        let url = detail_url("http://localhost:8080/api?v=1", "k", "tt0111161");
        assert_eq!(url, "http://localhost:8080/api?v=1&apikey=k&i=tt0111161");
    }
}
