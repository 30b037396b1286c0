use super::{confirm, prompt_with_default, Context};
use crate::cli::{DeleteArgs, EditArgs, ListArgs};
use crate::dialog::{DeleteDialog, DeleteOutcome, EditDialog, EditOutcome};
use crate::error::{ConsoleError, Result};
use crate::list::ListView;
use crate::output;
use crate::types::{User, UserUpdate};

/// How the edit form gets its values.
pub enum FormInput {
    /// Ask for every field, pre-filled with the current values; retry on failure.
    Prompt,
    /// Take the given fields as-is; unset fields keep their current value.
    Fields {
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    },
}

impl FormInput {
    fn fill(&self, form: &mut UserUpdate) -> Result<()> {
        match self {
            FormInput::Prompt => {
                form.first_name = prompt_with_default("First name", &form.first_name)?;
                form.last_name = prompt_with_default("Last name", &form.last_name)?;
                form.email = prompt_with_default("Email", &form.email)?;
            }
            FormInput::Fields {
                first_name,
                last_name,
                email,
            } => {
                if let Some(value) = first_name {
                    form.first_name = value.clone();
                }
                if let Some(value) = last_name {
                    form.last_name = value.clone();
                }
                if let Some(value) = email {
                    form.email = value.clone();
                }
            }
        }
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        matches!(self, FormInput::Prompt)
    }
}

/// Load the page a one-shot command works on (1-based). A page past the end is an error.
async fn load_page(ctx: &Context, page: u32) -> Result<ListView> {
    ctx.require_login()?;
    let mut view = ListView::at_page(page.saturating_sub(1));
    view.load(ctx.api.as_ref(), &ctx.session).await;

    let last = view.total_pages().max(1);
    if view.is_loaded() && page > last {
        return Err(ConsoleError::PageOutOfRange { page, last });
    }
    Ok(view)
}

fn select(view: &ListView, id: u64) -> Result<User> {
    view.find(id)
        .cloned()
        .ok_or(ConsoleError::UserNotOnPage {
            id,
            page: view.page_index() + 1,
        })
}

/// The authenticated landing page: first page of users.
pub async fn show_home(ctx: &Context) -> Result<()> {
    let view = load_page(ctx, 1).await?;
    output::print_page(&view);
    Ok(())
}

pub async fn list(ctx: &Context, args: ListArgs) -> Result<()> {
    let view = load_page(ctx, args.page).await?;
    output::print_page(&view);
    Ok(())
}

pub async fn edit(ctx: &Context, args: EditArgs) -> Result<()> {
    let mut view = load_page(ctx, args.page).await?;
    let input = if args.is_interactive() {
        FormInput::Prompt
    } else {
        FormInput::Fields {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
        }
    };

    match edit_in_view(ctx, &mut view, args.id, &input).await? {
        Some(user) => {
            output::print_item(&user, |u| {
                println!("{}", output::render_table(std::slice::from_ref(u)));
            });
            Ok(())
        }
        None => Ok(()),
    }
}

pub async fn delete(ctx: &Context, args: DeleteArgs) -> Result<()> {
    let mut view = load_page(ctx, args.page).await?;
    delete_in_view(ctx, &mut view, args.id, args.yes).await?;
    Ok(())
}

/// Run the edit dialog for `id` against the loaded page and patch the page on success.
///
/// Returns the updated record, or `None` when the dialog was dismissed. With
/// `FormInput::Fields` a failed submit is returned as an error; with
/// `FormInput::Prompt` the dialog stays open and offers a retry.
pub async fn edit_in_view(
    ctx: &Context,
    view: &mut ListView,
    id: u64,
    input: &FormInput,
) -> Result<Option<User>> {
    let user = select(view, id)?;
    let mut dialog = EditDialog::open(&user);

    if input.is_interactive() {
        output::print_message(&format!(
            "Edit User #{} ({})",
            dialog.user().id,
            dialog.user().full_name()
        ));
    }

    while dialog.is_open() {
        input.fill(dialog.form_mut())?;

        match dialog.submit(ctx.api.as_ref()).await {
            EditOutcome::Updated(updated) => {
                view.apply_update(updated.clone());
                output::print_success(&format!(
                    "User {} updated successfully!",
                    updated.first_name
                ));
                return Ok(Some(updated));
            }
            EditOutcome::Failed(message) => {
                if !input.is_interactive() {
                    return Err(ConsoleError::Dialog(message));
                }
                output::print_failure(dialog.error().unwrap_or(&message));
                if !confirm("Try again?")? {
                    dialog.close();
                }
            }
        }
    }

    Ok(None)
}

/// Run the delete dialog for `id` and drop the record from the page on success.
///
/// Returns whether the record was deleted.
pub async fn delete_in_view(
    ctx: &Context,
    view: &mut ListView,
    id: u64,
    skip_confirm: bool,
) -> Result<bool> {
    let user = select(view, id)?;
    let mut dialog = DeleteDialog::open(&user);

    while dialog.is_open() {
        if !skip_confirm {
            let question = format!(
                "Delete {} (#{})? This action cannot be undone.",
                dialog.user().full_name(),
                dialog.user().id
            );
            if !confirm(&question)? {
                dialog.close();
                break;
            }
        }

        match dialog.confirm(ctx.api.as_ref()).await {
            DeleteOutcome::Deleted(deleted) => {
                view.remove(deleted);
                output::print_success("User deleted successfully!");
                return Ok(true);
            }
            DeleteOutcome::Failed(message) => {
                if skip_confirm {
                    return Err(ConsoleError::Dialog(message));
                }
                output::print_failure(dialog.error().unwrap_or(&message));
            }
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryTokenStore, Session};
    use crate::testing::FakeApi;

    fn context(api: FakeApi, logged_in: bool) -> Context {
        let mut session = Session::open(Box::<MemoryTokenStore>::default());
        if logged_in {
            session.login("token".to_string()).unwrap();
        }
        Context::new(session, Box::new(api), "https://reqres.in/api".to_string())
    }

    #[tokio::test]
    async fn test_list_requires_login() {
        let ctx = context(FakeApi::with_pages(2), false);
        let err = load_page(&ctx, 1).await.unwrap_err();
        assert!(matches!(err, ConsoleError::NotLoggedIn));
    }

    #[tokio::test]
    async fn test_load_page_converts_to_zero_based_index() {
        let ctx = context(FakeApi::with_pages(2), true);
        let view = load_page(&ctx, 2).await.unwrap();
        assert_eq!(view.page_index(), 1);
        assert_eq!(view.users()[0].id, 7);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_an_error() {
        let ctx = context(FakeApi::with_pages(2), true);
        let err = load_page(&ctx, 9).await.unwrap_err();
        assert!(matches!(err, ConsoleError::PageOutOfRange { page: 9, last: 2 }));

        let view = load_page(&ctx, 2).await.unwrap();
        assert_eq!(view.page_index(), 1);
    }

    #[tokio::test]
    async fn test_edit_with_fields_patches_page() {
        let ctx = context(FakeApi::with_pages(2), true);
        let mut view = load_page(&ctx, 1).await.unwrap();
        let input = FormInput::Fields {
            first_name: Some("Tracey".into()),
            last_name: None,
            email: Some("tracey@example.com".into()),
        };

        let updated = edit_in_view(&ctx, &mut view, 6, &input).await.unwrap().unwrap();
        assert_eq!(updated.first_name, "Tracey");
        assert_eq!(updated.last_name, "Last6");
        assert_eq!(view.find(6), Some(&updated));
        assert_eq!(view.users().len(), 6);
    }

    #[tokio::test]
    async fn test_edit_with_invalid_fields_is_an_error() {
        let ctx = context(FakeApi::with_pages(2), true);
        let mut view = load_page(&ctx, 1).await.unwrap();
        let input = FormInput::Fields {
            first_name: Some(" ".into()),
            last_name: None,
            email: None,
        };

        let err = edit_in_view(&ctx, &mut view, 1, &input).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Dialog(ref m) if m == "First name is required"));
        assert_eq!(view.find(1).unwrap().first_name, "First1");
    }

    #[tokio::test]
    async fn test_edit_unknown_user_is_not_on_page() {
        let ctx = context(FakeApi::with_pages(2), true);
        let mut view = load_page(&ctx, 1).await.unwrap();
        let input = FormInput::Fields {
            first_name: None,
            last_name: None,
            email: None,
        };

        let err = edit_in_view(&ctx, &mut view, 9, &input).await.unwrap_err();
        assert!(matches!(err, ConsoleError::UserNotOnPage { id: 9, page: 1 }));
    }

    #[tokio::test]
    async fn test_delete_without_prompt_removes_record() {
        let ctx = context(FakeApi::with_pages(2), true);
        let mut view = load_page(&ctx, 2).await.unwrap();

        assert!(delete_in_view(&ctx, &mut view, 8, true).await.unwrap());
        assert_eq!(view.users().len(), 5);
        assert!(view.find(8).is_none());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record() {
        let api = FakeApi::with_pages(2);
        api.fail_mutations(true);
        let ctx = context(api, true);
        let mut view = load_page(&ctx, 1).await.unwrap();

        let err = delete_in_view(&ctx, &mut view, 2, true).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Dialog(ref m) if m == crate::dialog::DELETE_FAILED));
        assert!(view.find(2).is_some());
        assert_eq!(view.users().len(), 6);
    }
}
