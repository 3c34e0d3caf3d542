use maud::{html, Markup};

use crate::page::{self, FormErrors};

use super::model::{LoginInput, SignupInput};

pub fn login(input: &LoginInput, errors: &FormErrors) -> Markup {
	page::layout(
		"Log in",
		None,
		html! {
			(errors.field("__all__"))
			form method="post" action="/auth/login/" {
				@if let Some(next) = &input.next {
					input type="hidden" name="next" value=(next);
				}
				p {
					label for="username" { "Username" }
					input id="username" type="text" name="username" value=(input.username) required;
				}
				p {
					label for="password" { "Password" }
					input id="password" type="password" name="password" required;
				}
				button type="submit" { "Log in" }
			}
			p { "No account yet? " a href="/auth/signup/" { "Sign up" } }
		},
	)
}

pub fn signup(input: &SignupInput, errors: &FormErrors) -> Markup {
	page::layout(
		"Sign up",
		None,
		html! {
			form method="post" action="/auth/signup/" {
				p {
					label for="email" { "Email" }
					input id="email" type="email" name="email" value=(input.email) required;
					(errors.field("email"))
				}
				p {
					label for="username" { "Username" }
					input id="username" type="text" name="username" value=(input.username) required;
					(errors.field("username"))
				}
				p {
					label for="password" { "Password" }
					input id="password" type="password" name="password" required;
					(errors.field("password"))
				}
				button type="submit" { "Sign up" }
			}
		},
	)
}
