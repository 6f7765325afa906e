//! Team finder sections: the full finder grid and its front-page teaser.
//!
//! The finder renders from the snapshot's ranked team list. When a search
//! query geocoded, cards carry distances and the grid is distance-ordered;
//! when geocoding failed, a notice explains the alphabetical fallback.

use maud::{Markup, html};

use crate::blocks::{TeamFinderBlock, TeamFinderTeaserBlock};
use crate::builder::RenderCtx;
use crate::geo;
use crate::teams::RankedTeam;

pub fn render_finder(block: &TeamFinderBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    let placeholder = block
        .search_placeholder
        .as_deref()
        .unwrap_or("Enter your city or postcode...");
    let no_results = block.no_results_message.as_deref().unwrap_or("No teams found.");

    html! {
        section class={ "team-finder " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            header.section-header {
                @if let Some(eyebrow) = &block.eyebrow { span.eyebrow { (eyebrow) } }
                @if let Some(title) = &block.title { h2 { (title) } }
                @if let Some(description) = &block.description { p { (description) } }
            }
            form.finder-search method="get" action="" {
                input type="text" name="q" placeholder=(placeholder) aria-label="Search location";
                button.btn.btn-default type="submit" data-single-submit { "Search" }
            }
            @if ctx.geocode_failed {
                p.finder-notice { "Couldn't find that location. Showing all teams." }
            }
            @if ctx.teams.is_empty() {
                p.no-results { (no_results) }
            } @else {
                div.card-grid.team-grid {
                    @for ranked in ctx.teams {
                        (team_card(ranked))
                    }
                }
            }
        }
    }
}

pub fn render_teaser(block: &TeamFinderTeaserBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    let placeholder = block
        .search_placeholder
        .as_deref()
        .unwrap_or("Enter your city or postcode...");
    let cta = block.cta_text.as_deref().unwrap_or("Find a team");

    html! {
        section class={ "team-finder-teaser " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            @if let Some(eyebrow) = &block.eyebrow { span.eyebrow { (eyebrow) } }
            @if let Some(title) = &block.title { h2 { (title) } }
            @if let Some(description) = &block.description { p { (description) } }
            form.finder-search method="get" action="/teams/" {
                input type="text" name="q" placeholder=(placeholder) aria-label="Search location";
                button.btn.btn-default type="submit" { (cta) }
            }
            @if block.show_stats && !ctx.teams.is_empty() {
                p.teaser-stats { (ctx.teams.len()) " teams and counting" }
            }
        }
    }
}

fn team_card(ranked: &RankedTeam) -> Markup {
    let team = &ranked.team;
    let flag = geo::country_flag(team.country.as_deref());

    html! {
        article.card.team-card style=[team.primary_color.as_deref().map(|c| format!("--team-color: {c}"))] {
            header.team-card-header {
                @if let Some(logo) = team.logo_url.as_deref().filter(|l| !l.is_empty()) {
                    img.team-logo src=(logo) alt="" loading="lazy";
                }
                h3 { (team.name) }
            }
            @if team.location_name.is_some() || !flag.is_empty() {
                p.team-location {
                    @if let Some(location) = &team.location_name { (location) " " }
                    (flag)
                }
            }
            @if let Some(distance) = ranked.distance_km {
                span.team-distance { (geo::format_distance(distance)) " away" }
            }
            @if !team.leagues.is_empty() {
                ul.team-leagues {
                    @for league in &team.leagues { li { (league) } }
                }
            }
            @if let Some(links) = &team.social_links {
                nav.team-links {
                    @if let Some(url) = &links.website { a href=(url) rel="noopener" { "Website" } }
                    @if let Some(url) = &links.facebook { a href=(url) rel="noopener" { "Facebook" } }
                    @if let Some(url) = &links.instagram { a href=(url) rel="noopener" { "Instagram" } }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_config, test_team};
    use crate::teams::rank_teams;

    fn finder_block() -> TeamFinderBlock {
        TeamFinderBlock {
            key: "tf".to_string(),
            title: Some("Find a team near you".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_directory_shows_no_results_message() {
        let config = test_config();
        let ctx = RenderCtx::new(&config, &[], &[], false);
        let mut block = finder_block();
        block.no_results_message = Some("Nobody races here yet.".to_string());
        let html = render_finder(&block, &ctx).into_string();
        assert!(html.contains("Nobody races here yet."));
    }

    #[test]
    fn teams_render_as_cards() {
        let config = test_config();
        let teams = vec![test_team("Zoomies", Some((51.5, -0.1)))];
        let ranked = rank_teams(&teams, None);
        let ctx = RenderCtx::new(&config, &[], &ranked, false);
        let html = render_finder(&finder_block(), &ctx).into_string();
        assert!(html.contains("Zoomies"));
        assert!(html.contains("team-card"));
        // No search, so no distance badges
        assert!(!html.contains("team-distance"));
    }

    #[test]
    fn distances_shown_after_successful_search() {
        let config = test_config();
        let teams = vec![test_team("Zoomies", Some((51.6, -0.2)))];
        let ranked = rank_teams(&teams, Some(geo::Coords { lat: 51.5, lng: -0.1 }));
        let ctx = RenderCtx::new(&config, &[], &ranked, false);
        let html = render_finder(&finder_block(), &ctx).into_string();
        assert!(html.contains("team-distance"));
        assert!(html.contains("away"));
    }

    #[test]
    fn geocode_failure_shows_notice() {
        let config = test_config();
        let ctx = RenderCtx::new(&config, &[], &[], true);
        let html = render_finder(&finder_block(), &ctx).into_string();
        assert!(html.contains("Couldn't find that location"));
    }

    #[test]
    fn teaser_stats_line_counts_teams() {
        let config = test_config();
        let teams = vec![
            test_team("A", Some((51.0, 0.0))),
            test_team("B", Some((52.0, 0.0))),
        ];
        let ranked = rank_teams(&teams, None);
        let ctx = RenderCtx::new(&config, &[], &ranked, false);
        let block = TeamFinderTeaserBlock {
            key: "tt".to_string(),
            title: Some("Race with us".to_string()),
            show_stats: true,
            ..Default::default()
        };
        let html = render_teaser(&block, &ctx).into_string();
        assert!(html.contains("2 teams and counting"));
    }
}
