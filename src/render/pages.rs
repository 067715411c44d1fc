use axum::http::StatusCode;
use serde_json::Value;

use crate::catalog::Lookup;
use crate::models::{DetailContext, HomeContext, ResourceKind, SearchContext};
use crate::render::filters::{format_duration, format_number};
use crate::render::escape;

const EMPTY_STATE: &str = r#"<p class="empty">Nothing found.</p>"#;

fn text<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

fn items<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

static NULL: Value = Value::Null;

fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - Tunedeck</title>
</head>
<body>
<nav>
  <a href="/">Home</a>
  <a href="/editorial">Editorial</a>
  <a href="/genre">Genres</a>
  <a href="/radio">Radio</a>
  <form action="/search" method="get">
    <input type="search" name="q" placeholder="Search the catalog">
    <select name="type">
      <option value="track">Tracks</option>
      <option value="album">Albums</option>
      <option value="artist">Artists</option>
      <option value="playlist">Playlists</option>
    </select>
    <button type="submit">Search</button>
  </form>
</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}

pub fn home_page(ctx: &HomeContext) -> String {
    let mut body = String::new();

    body.push_str(r#"<section id="chart"><h2>Charts</h2>"#);
    match ctx.chart.found() {
        Some(chart) => {
            body.push_str("<ol>");
            for track in items(chart, "/tracks/data") {
                let id = track.get("id").map(Value::to_string).unwrap_or_default();
                body.push_str(&format!(
                    r#"<li><a href="/track/{id}">{title}</a> — {artist} <span class="duration">{duration}</span></li>"#,
                    id = escape(id.trim_matches('"')),
                    title = escape(text(track, "/title").unwrap_or("Untitled")),
                    artist = escape(text(track, "/artist/name").unwrap_or("Unknown artist")),
                    duration = format_duration(field(track, "duration")),
                ));
            }
            body.push_str("</ol>");
        }
        None => body.push_str(EMPTY_STATE),
    }
    body.push_str("</section>");

    body.push_str(r#"<section id="editorial"><h2>Editorial picks</h2>"#);
    match ctx.editorial.found() {
        Some(editorial) => body.push_str(&link_grid(items(editorial, "/data"), "editorial", "/name")),
        None => body.push_str(EMPTY_STATE),
    }
    body.push_str("</section>");

    layout("Home", &body)
}

pub fn search_page(ctx: &SearchContext) -> String {
    let mut body = format!(
        r#"<section id="results"><h2>Search</h2><p>Query: <em>{query}</em> ({kind})</p>"#,
        query = escape(&ctx.query),
        kind = escape(&ctx.search_type),
    );

    match ctx.results.found() {
        Some(results) => {
            let rows = items(results, "/data");
            if rows.is_empty() {
                body.push_str(EMPTY_STATE);
            } else {
                body.push_str("<ul>");
                for item in rows {
                    body.push_str(&search_row(item));
                }
                body.push_str("</ul>");
            }
        }
        None => body.push_str(EMPTY_STATE),
    }
    body.push_str("</section>");

    layout("Search", &body)
}

fn search_row(item: &Value) -> String {
    let id = item.get("id").map(Value::to_string).unwrap_or_default();
    // Search rows self-describe their resource kind; route accordingly.
    let kind = text(item, "/type").unwrap_or("track");
    let label = text(item, "/title")
        .or_else(|| text(item, "/name"))
        .unwrap_or("Untitled");

    let mut extra = String::new();
    if let Some(artist) = text(item, "/artist/name") {
        extra = format!(" — {}", escape(artist));
    }

    format!(
        r#"<li><a href="/{kind}/{id}">{label}</a>{extra}</li>"#,
        kind = escape(kind),
        id = escape(id.trim_matches('"')),
        label = escape(label),
        extra = extra,
    )
}

pub fn detail_page(ctx: &DetailContext) -> String {
    let mut body = format!(
        r#"<section id="detail" data-kind="{kind}"><h2>{title}</h2>"#,
        kind = ctx.kind.as_str(),
        title = escape(&ctx.title),
    );

    if let Some(editorial_id) = &ctx.editorial_id {
        body.push_str(&format!(
            r#"<p class="crumb"><a href="/editorial">Editorial</a> / {}</p>"#,
            escape(editorial_id),
        ));
    }

    match ctx.payload.found() {
        Some(payload) => body.push_str(&detail_body(ctx.kind, payload)),
        None => body.push_str(EMPTY_STATE),
    }
    body.push_str("</section>");

    if let Some(top_tracks) = &ctx.top_tracks {
        body.push_str(r#"<section id="top-tracks"><h3>Top tracks</h3>"#);
        match top_tracks.found() {
            Some(tracks) => {
                body.push_str("<ol>");
                for track in items(tracks, "/data") {
                    let id = track.get("id").map(Value::to_string).unwrap_or_default();
                    body.push_str(&format!(
                        r#"<li><a href="/track/{id}">{title}</a> <span class="duration">{duration}</span></li>"#,
                        id = escape(id.trim_matches('"')),
                        title = escape(text(track, "/title").unwrap_or("Untitled")),
                        duration = format_duration(field(track, "duration")),
                    ));
                }
                body.push_str("</ol>");
            }
            None => body.push_str(EMPTY_STATE),
        }
        body.push_str("</section>");
    }

    layout(&ctx.title, &body)
}

fn detail_body(kind: ResourceKind, payload: &Value) -> String {
    match kind {
        ResourceKind::Track => {
            let mut out = format!(
                "<dl><dt>Title</dt><dd>{}</dd><dt>Artist</dt><dd>{}</dd><dt>Album</dt><dd>{}</dd><dt>Duration</dt><dd>{}</dd><dt>Rank</dt><dd>{}</dd>",
                escape(text(payload, "/title").unwrap_or("Untitled")),
                escape(text(payload, "/artist/name").unwrap_or("Unknown artist")),
                escape(text(payload, "/album/title").unwrap_or("Unknown album")),
                format_duration(field(payload, "duration")),
                format_number(field(payload, "rank")),
            );
            if let Some(date) = text(payload, "/release_date") {
                out.push_str(&format!("<dt>Released</dt><dd>{}</dd>", escape(date)));
            }
            out.push_str("</dl>");
            out
        }
        ResourceKind::Album => {
            let mut out = format!(
                "<dl><dt>Title</dt><dd>{}</dd><dt>Artist</dt><dd>{}</dd><dt>Tracks</dt><dd>{}</dd><dt>Fans</dt><dd>{}</dd></dl>",
                escape(text(payload, "/title").unwrap_or("Untitled")),
                escape(text(payload, "/artist/name").unwrap_or("Unknown artist")),
                format_number(field(payload, "nb_tracks")),
                format_number(field(payload, "fans")),
            );
            out.push_str(&track_list(items(payload, "/tracks/data")));
            out
        }
        ResourceKind::Artist => format!(
            "<dl><dt>Name</dt><dd>{}</dd><dt>Albums</dt><dd>{}</dd><dt>Fans</dt><dd>{}</dd></dl>",
            escape(text(payload, "/name").unwrap_or("Unknown artist")),
            format_number(field(payload, "nb_album")),
            format_number(field(payload, "nb_fan")),
        ),
        ResourceKind::Playlist => {
            let mut out = format!(
                "<dl><dt>Title</dt><dd>{}</dd><dt>By</dt><dd>{}</dd><dt>Tracks</dt><dd>{}</dd><dt>Fans</dt><dd>{}</dd></dl>",
                escape(text(payload, "/title").unwrap_or("Untitled")),
                escape(text(payload, "/creator/name").unwrap_or("Unknown")),
                format_number(field(payload, "nb_tracks")),
                format_number(field(payload, "fans")),
            );
            if let Some(description) = text(payload, "/description") {
                out.push_str(&format!("<p>{}</p>", escape(description)));
            }
            out.push_str(&track_list(items(payload, "/tracks/data")));
            out
        }
        ResourceKind::User => format!(
            "<dl><dt>Name</dt><dd>{}</dd><dt>Country</dt><dd>{}</dd></dl>",
            escape(text(payload, "/name").unwrap_or("Unknown")),
            escape(text(payload, "/country").unwrap_or("-")),
        ),
        ResourceKind::Episode => format!(
            "<dl><dt>Title</dt><dd>{}</dd><dt>Podcast</dt><dd>{}</dd><dt>Duration</dt><dd>{}</dd><dt>Released</dt><dd>{}</dd></dl>",
            escape(text(payload, "/title").unwrap_or("Untitled")),
            escape(text(payload, "/podcast/title").unwrap_or("Unknown podcast")),
            format_duration(field(payload, "duration")),
            escape(text(payload, "/release_date").unwrap_or("-")),
        ),
        ResourceKind::Editorial => link_grid(items(payload, "/data"), "editorial", "/name"),
        // The selection returns albums.
        ResourceKind::EditorialDetail => link_grid(items(payload, "/data"), "album", "/title"),
        ResourceKind::Genre => link_grid(items(payload, "/data"), "genre", "/name"),
        ResourceKind::Radio => link_grid(items(payload, "/data"), "radio", "/title"),
    }
}

fn track_list(tracks: &[Value]) -> String {
    if tracks.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ol>");
    for track in tracks {
        let id = track.get("id").map(Value::to_string).unwrap_or_default();
        out.push_str(&format!(
            r#"<li><a href="/track/{id}">{title}</a> <span class="duration">{duration}</span></li>"#,
            id = escape(id.trim_matches('"')),
            title = escape(text(track, "/title").unwrap_or("Untitled")),
            duration = format_duration(field(track, "duration")),
        ));
    }
    out.push_str("</ol>");
    out
}

/// Grid of linked entries for the list-shaped resources (editorials, genres,
/// radios). Entries without an id render as plain labels.
fn link_grid(entries: &[Value], route: &str, label_pointer: &str) -> String {
    if entries.is_empty() {
        return EMPTY_STATE.to_string();
    }
    let mut out = String::from(r#"<ul class="grid">"#);
    for entry in entries {
        let label = escape(text(entry, label_pointer).unwrap_or("Untitled"));
        match entry.get("id") {
            Some(id) if route == "editorial" || route == "album" => out.push_str(&format!(
                r#"<li><a href="/{route}/{id}">{label}</a></li>"#,
                route = route,
                id = escape(id.to_string().trim_matches('"')),
                label = label,
            )),
            _ => out.push_str(&format!("<li>{}</li>", label)),
        }
    }
    out.push_str("</ul>");
    out
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<section id="error"><h2>{code} {reason}</h2><p>{message}</p><p><a href="/">Back to home</a></p></section>"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = escape(message),
    );
    layout("Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_page_renders_absence_as_placeholder() {
        let ctx = DetailContext::new(Lookup::Absent, "Track Details", ResourceKind::Track);
        let html = detail_page(&ctx);

        assert!(html.contains("Nothing found."));
        assert!(html.contains(r#"data-kind="track""#));
    }

    #[test]
    fn detail_page_renders_track_fields() {
        let payload = json!({
            "id": 3135556,
            "title": "Harder, Better, Faster, Stronger",
            "duration": 224,
            "rank": 956167,
            "artist": {"name": "Daft Punk"},
            "album": {"title": "Discovery"}
        });
        let ctx = DetailContext::new(Lookup::Found(payload), "Track Details", ResourceKind::Track);
        let html = detail_page(&ctx);

        assert!(html.contains("Harder, Better, Faster, Stronger"));
        assert!(html.contains("Daft Punk"));
        assert!(html.contains("3:44"));
        assert!(html.contains("956,167"));
    }

    #[test]
    fn artist_page_keeps_detail_and_top_tracks_sections_independent() {
        let artist = json!({"id": 27, "name": "Daft Punk", "nb_album": 36, "nb_fan": 9738556});
        let ctx = DetailContext::new(Lookup::Found(artist), "Artist Details", ResourceKind::Artist)
            .with_top_tracks(Lookup::Absent);
        let html = detail_page(&ctx);

        assert!(html.contains(r#"<section id="top-tracks">"#));
        assert!(html.contains("9,738,556"));
        // The detail section survives even though the secondary call failed.
        assert!(html.contains("Nothing found."));
    }

    #[test]
    fn search_page_escapes_the_echoed_query() {
        let ctx = SearchContext {
            results: Lookup::Absent,
            query: "<script>alert(1)</script>".to_string(),
            search_type: "track".to_string(),
        };
        let html = search_page(&ctx);

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn home_page_renders_both_sections() {
        let ctx = HomeContext {
            chart: Lookup::Found(json!({"tracks": {"data": [
                {"id": 1, "title": "One More Time", "duration": 320, "artist": {"name": "Daft Punk"}}
            ]}})),
            editorial: Lookup::Absent,
        };
        let html = home_page(&ctx);

        assert!(html.contains("One More Time"));
        assert!(html.contains("5:20"));
        assert!(html.contains(r#"<section id="editorial">"#));
        assert!(html.contains("Nothing found."));
    }

    #[test]
    fn error_page_carries_status_and_message() {
        let html = error_page(StatusCode::NOT_FOUND, "No page at /nope");
        assert!(html.contains("404 Not Found"));
        assert!(html.contains("No page at /nope"));
    }
}
