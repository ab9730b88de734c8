//! Song commands: create, list, show, verse, update, delete.

use crate::catalog::{CatalogService, RequestContext};
use crate::error::{Error, Result};
use crate::model::{CreateSong, ListQuery, Song, SongPatch};

/// Add a song and print its id
pub async fn cmd_create(
    service: &CatalogService,
    ctx: &RequestContext,
    cmd: &CreateSong,
) -> Result<()> {
    let id = service.add_song(ctx, cmd).await?;
    println!("Created song {id}");
    Ok(())
}

/// Print one page of songs
pub async fn cmd_list(
    service: &CatalogService,
    ctx: &RequestContext,
    query: &ListQuery,
    json: bool,
) -> Result<()> {
    let page = service.list_songs(ctx, query).await?;

    if json {
        println!("{}", to_json(&page)?);
        return Ok(());
    }
    if page.is_empty() {
        println!("no songs found");
        return Ok(());
    }

    for song in &page {
        println!("{}", list_line(song));
    }
    if let Some(last) = page.last() {
        println!("\nNext page: --cursor {}", last.id);
    }
    Ok(())
}

/// Print every field of one song
pub async fn cmd_show(
    service: &CatalogService,
    ctx: &RequestContext,
    id: i64,
    json: bool,
) -> Result<()> {
    let song = service.get_song(ctx, id).await?;
    if json {
        println!("{}", to_json(&song)?);
    } else {
        print!("{}", details(&song));
    }
    Ok(())
}

/// Print a single verse
pub async fn cmd_verse(
    service: &CatalogService,
    ctx: &RequestContext,
    id: i64,
    index: usize,
) -> Result<()> {
    let verse = service.get_verse(ctx, id, index).await?;
    println!("{verse}");
    Ok(())
}

pub async fn cmd_update(
    service: &CatalogService,
    ctx: &RequestContext,
    patch: &SongPatch,
) -> Result<()> {
    service.update_song(ctx, patch).await?;
    let fields: Vec<_> = patch.present_fields().map(|f| f.name()).collect();
    println!("Updated song {} ({})", patch.id, fields.join(", "));
    Ok(())
}

pub async fn cmd_delete(service: &CatalogService, ctx: &RequestContext, id: i64) -> Result<()> {
    service.delete_song(ctx, id).await?;
    println!("Deleted song {id}");
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::internal(format!("failed to encode JSON: {e}")))
}

fn list_line(song: &Song) -> String {
    format!(
        "{:>5}  {} - {} [{}]",
        song.id,
        song.group,
        song.title,
        song.release_date.as_deref().unwrap_or("-")
    )
}

fn details(song: &Song) -> String {
    let mut out = format!(
        "ID:           {}\nGroup:        {}\nTitle:        {}\nRelease date: {}\nLink:         {}\n",
        song.id,
        song.group,
        song.title,
        song.release_date.as_deref().unwrap_or("-"),
        song.link.as_deref().unwrap_or("-"),
    );
    match song.lyrics.as_deref() {
        Some(lyrics) if !lyrics.is_empty() => {
            out.push('\n');
            out.push_str(lyrics);
            out.push('\n');
        }
        _ => out.push_str("Lyrics:       -\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song() -> Song {
        Song {
            id: 7,
            group: "Muse".into(),
            title: "Uprising".into(),
            release_date: None,
            lyrics: Some("one\n\ntwo".into()),
            link: Some("https://example.com".into()),
        }
    }

    #[test]
    fn test_list_line_marks_missing_date() {
        assert_eq!(list_line(&song()), "    7  Muse - Uprising [-]");
    }

    #[test]
    fn test_details_include_lyrics() {
        let text = details(&song());
        assert!(text.contains("Group:        Muse"));
        assert!(text.contains("Link:         https://example.com"));
        assert!(text.ends_with("one\n\ntwo\n"));
    }

    #[test]
    fn test_details_without_lyrics() {
        let text = details(&Song {
            lyrics: None,
            ..song()
        });
        assert!(text.ends_with("Lyrics:       -\n"));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = to_json(&song()).unwrap();
        assert!(json.contains("\"releaseDate\": null"));
        assert!(json.contains("\"group\": \"Muse\""));
    }
}
