use maud::{html, Markup};

use crate::{
	page,
	route::{
		auth::model::User,
		post::{
			model::{Page, Post},
			view,
		},
	},
};

use super::model::ProfileStats;

/// The profile header followed by the author's posts.
///
/// `following` is `None` when the viewer is looking at their own profile.
pub fn profile(
	author: &User,
	viewer: &User,
	stats: ProfileStats,
	following: Option<bool>,
	posts: &Page<Post>,
) -> Markup {
	page::layout(
		&author.username,
		Some(viewer),
		html! {
			section.profile {
				ul.stats {
					li { "Posts: " (stats.posts) }
					li { "Followers: " (stats.followers) }
					li { "Following: " (stats.following) }
				}
				@match following {
					Some(true) => {
						form method="post" action={ "/" (author.username) "/unfollow/" } {
							button type="submit" { "Unfollow" }
						}
					}
					Some(false) => {
						form method="post" action={ "/" (author.username) "/follow/" } {
							button type="submit" { "Follow" }
						}
					}
					None => {}
				}
			}
			(view::listing(posts, Some(viewer)))
		},
	)
}
