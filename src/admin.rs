//! Admin commands: authentication and document edits.
//!
//! Every mutating command loads the document, applies one edit through an
//! [`EditorSession`] and saves the whole document once.

use crate::{
    cli::{
        AdminCommand, GalleryCommand, PackageCommand, PackageFields, UploadSlot, ValueCommand,
        ValueFieldArg,
    },
    client::ContentClient,
    config::SiteConfig,
    content::SectionName,
    editor::{EditorSession, ImageSlot, PackageDraft, ValueField, ValueKey, fields_of, lookup},
    log,
    logger::{Toast, toast},
};
use anyhow::{Context, Result, anyhow, bail};
use std::path::Path;

// ============================================================================
// Authentication
// ============================================================================

pub fn login(config: &SiteConfig, username: &str, password: &str) -> Result<()> {
    let client = ContentClient::from_config(config)?;
    if !client.login(username, password) {
        bail!("Login failed for `{username}`");
    }
    toast(Toast::Success, "Sessão iniciada");
    Ok(())
}

pub fn logout(config: &SiteConfig) -> Result<()> {
    ContentClient::from_config(config)?.logout()?;
    toast(Toast::Info, "Sessão terminada");
    Ok(())
}

pub fn status(config: &SiteConfig) -> Result<()> {
    let client = ContentClient::from_config(config)?;
    if client.is_authenticated() {
        log!("auth"; "logged in (token stored in {})", config.api.state.display());
    } else {
        log!("auth"; "not logged in, run `enju login -u <USER>`");
    }
    Ok(())
}

// ============================================================================
// Editor Commands
// ============================================================================

pub fn run(command: &AdminCommand, config: &SiteConfig) -> Result<()> {
    let client = ContentClient::from_config(config)?;

    let (mut session, message) = match command {
        AdminCommand::UploadVideo { file } => return upload_video(&client, file),
        AdminCommand::Show { section } => {
            show(&mut open_session(&client)?, *section);
            return Ok(());
        }
        AdminCommand::Set { field, value } => {
            let spec = lookup(field).ok_or_else(|| anyhow!("Unknown field `{field}`"))?;
            let mut session = open_session(&client)?;
            session.select(spec.section);
            session.set_field(field, value.as_str())?;
            if let Some(section) = session.active() {
                log!("admin"; "{field} updated in {}", section.title());
            }
            (session, "Alterações salvas com sucesso!")
        }
        AdminCommand::Package { command } => {
            let mut session = open_session(&client)?;
            let message = package(&mut session, &client, command)?;
            (session, message)
        }
        AdminCommand::Value { command } => {
            let mut session = open_session(&client)?;
            let message = value(&mut session, command)?;
            (session, message)
        }
        AdminCommand::Gallery { command } => {
            let mut session = open_session(&client)?;
            let message = gallery(&mut session, &client, command)?;
            (session, message)
        }
        AdminCommand::Upload { slot, file } => {
            let slot = match slot {
                UploadSlot::HeroImage => ImageSlot::HeroImage,
                UploadSlot::AboutImage => ImageSlot::AboutImage,
                UploadSlot::HeaderLogo => ImageSlot::HeaderLogo,
            };
            let mut session = open_session(&client)?;
            upload(&mut session, &client, slot, file)?;
            (session, "Imagem atualizada com sucesso!")
        }
    };

    session
        .save(&client)
        .map_err(|err| anyhow!("Erro ao salvar: {err}"))?;
    toast(Toast::Success, message);
    Ok(())
}

/// Load the document into a fresh editor session.
fn open_session(client: &ContentClient) -> Result<EditorSession> {
    let document = client
        .load()
        .context("No content available from the API or the fallback file")?;
    Ok(EditorSession::new(document))
}

/// Videos are hosted only; no document field points at them.
fn upload_video(client: &ContentClient, file: &Path) -> Result<()> {
    toast(Toast::Info, "Enviando vídeo...");
    let url = client.upload_video(file)?;
    println!("{url}");
    toast(Toast::Success, "Vídeo enviado com sucesso!");
    Ok(())
}

fn upload(
    session: &mut EditorSession,
    client: &ContentClient,
    slot: ImageSlot,
    file: &Path,
) -> Result<String> {
    toast(Toast::Info, "Enviando imagem...");
    session
        .upload_image(client, slot, file)
        .map_err(|err| anyhow!("Erro no upload: {err}"))
}

fn package(
    session: &mut EditorSession,
    client: &ContentClient,
    command: &PackageCommand,
) -> Result<&'static str> {
    let fields = match command {
        PackageCommand::Remove { id } => {
            let removed = session.remove_package(id)?;
            log!("admin"; "removed `{}` ({})", removed.title, removed.id);
            return Ok("Pacote removido com sucesso");
        }
        PackageCommand::Add { fields } => {
            session.open_add_package()?;
            fields
        }
        PackageCommand::Edit { id, fields } => {
            session.open_edit_package(id)?;
            fields
        }
    };

    if let Some(modal) = session.modal() {
        log!("admin"; "{}", modal.title());
    }
    apply_fields(session.draft_mut()?, fields);
    if let Some(image) = &fields.image
        && let Err(err) = upload(session, client, ImageSlot::PackageImage, image)
    {
        session.cancel_package();
        return Err(err);
    }

    let id = session.confirm_package()?;
    log!("admin"; "package `{id}`");
    Ok("Pacote salvo com sucesso")
}

fn apply_fields(draft: &mut PackageDraft, fields: &PackageFields) {
    let targets = [
        (&mut draft.title, &fields.title),
        (&mut draft.location, &fields.location),
        (&mut draft.price, &fields.price),
        (&mut draft.duration, &fields.duration),
        (&mut draft.description_long, &fields.description),
        (&mut draft.included, &fields.included),
    ];
    for (slot, value) in targets {
        if let Some(value) = value {
            slot.clone_from(value);
        }
    }
}

/// Key of the value at 1-based `position`.
fn value_key(session: &EditorSession, position: usize) -> Result<ValueKey> {
    position
        .checked_sub(1)
        .and_then(|index| session.value_keys().get(index).copied())
        .ok_or_else(|| anyhow!("No value at position {position}"))
}

fn value(session: &mut EditorSession, command: &ValueCommand) -> Result<&'static str> {
    match command {
        ValueCommand::Add { title, desc } => {
            let key = session.add_value()?;
            session.update_value(key, ValueField::Title, title.as_str())?;
            session.update_value(key, ValueField::Desc, desc.as_str())?;
        }
        ValueCommand::Set {
            position,
            field,
            value,
        } => {
            let key = value_key(session, *position)?;
            let field = match field {
                ValueFieldArg::Title => ValueField::Title,
                ValueFieldArg::Desc => ValueField::Desc,
            };
            session.update_value(key, field, value.as_str())?;
        }
        ValueCommand::Remove { position } => {
            let key = value_key(session, *position)?;
            session.remove_value(key)?;
        }
    }
    Ok("Alterações salvas com sucesso!")
}

fn gallery(
    session: &mut EditorSession,
    client: &ContentClient,
    command: &GalleryCommand,
) -> Result<&'static str> {
    match command {
        GalleryCommand::Add { file, caption } => {
            let slot = ImageSlot::GalleryItem {
                caption: caption.clone(),
            };
            upload(session, client, slot, file)?;
            Ok("Imagem adicionada à galeria")
        }
        GalleryCommand::Remove { position } => {
            let index = position
                .checked_sub(1)
                .ok_or_else(|| anyhow!("Positions start at 1"))?;
            session.remove_gallery_item(index)?;
            Ok("Imagem removida da galeria")
        }
    }
}

// ============================================================================
// Show
// ============================================================================

fn show(session: &mut EditorSession, only: Option<SectionName>) {
    let sections = match only {
        Some(section) => vec![section],
        None => SectionName::ALL.to_vec(),
    };

    for section in sections {
        session.select(section);
        println!("== {} ({section})", section.title());

        if !session.document().has_section(section) {
            println!("   (missing)");
            continue;
        }

        for spec in fields_of(section) {
            println!("   {:<22} {}", spec.id, session.field(spec.id).unwrap_or_default());
        }

        let document = session.document();
        match section {
            SectionName::Packages => {
                for pkg in document.package_items() {
                    println!("   - {} | {} | {} | {}", pkg.id, pkg.title, pkg.location, pkg.price);
                }
            }
            SectionName::Gallery => {
                for (n, item) in document.gallery.iter().flat_map(|g| &g.items).enumerate() {
                    println!("   {}. {} | {}", n + 1, item.image, item.caption);
                }
            }
            SectionName::About => {
                for (n, value) in document.about.iter().flat_map(|a| &a.values).enumerate() {
                    println!("   {}. {} | {}", n + 1, value.title, value.desc);
                }
            }
            _ => {}
        }
    }
}
