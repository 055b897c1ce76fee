use crate::generator_messages::generator_errors::{
    ErrorMetaDataKey, ErrorType, GeneratorError, GeneratorMessages, error_type_to_str,
};
use crate::generator_messages::generator_warnings::print_formatted_warning;
use saying::say;

pub fn print_generator_messages(messages: GeneratorMessages, show_warnings: bool) {
    for err in messages.errors {
        print_formatted_error(err);
    }

    if show_warnings {
        for warning in messages.warnings {
            print_formatted_warning(warning);
        }
    }
}

pub fn print_formatted_error(e: GeneratorError) {
    let location = e.location.to_string();

    match e.error_type {
        ErrorType::Schema => {
            say!("\n(╯°□°)╯  🔥🔥 ", Dark Magenta location, " 🔥🔥  Σ(°△°;) ");
            say!(Red "Schema");
        }

        ErrorType::UnresolvedOwnership => {
            say!("\n(ಠ_ಠ) ", Dark Magenta location);
            say!(Red "Unresolved Ownership");
        }

        ErrorType::IdentifierCollision | ErrorType::Relocation => {
            say!("\nヽ(˶°o°)ﾉ  🔥🔥🔥 ", Dark Magenta location, " 🔥🔥🔥  ╰(°□°╰) ");
            say!(Red error_type_to_str(&e.error_type));
        }

        ErrorType::Cycle => {
            say!("\n(╯°Д°)╯  🔥🔥 ", Dark Magenta location, " 🔥🔥  ╰(°□°╰) ");
            say!(Red "Inheritance Cycle");
        }

        ErrorType::UnusedOwnershipEntry => {
            say!("\n(ﾉ☉_⚆)ﾉ  🔥 ", Dark Magenta location, " 🔥 ╰(° O °)╯ ");
            say!(Yellow "Ownership table drift");
        }

        ErrorType::File => {
            say!(Yellow "🏚 Can't find/read file or directory: ", location);
            say!(e.msg);
            return;
        }

        ErrorType::Fetch => {
            say!(Yellow "Could not download the API schema: ", Red e.msg);
            return;
        }

        ErrorType::Config => {
            say!("\n (-_-)  🔥🔥🔥🔥 ", Dark Magenta location, " 🔥🔥🔥🔥  <(^~^)/ ");
            say!(Yellow "CONFIG FILE ISSUE - ");
            say!(Dark Yellow "Malformed config file, something doesn't make sense inside bindgen.toml");
        }

        ErrorType::Generator => {
            say!(Yellow "GENERATOR BUG - ");
            say!(Dark Yellow "generator developer skill issue (not your fault)");
        }
    }

    say!(Red e.msg);

    let mut details = e.metadata.into_iter().collect::<Vec<_>>();
    details.sort_by_key(|(key, _)| metadata_order(*key));
    for (key, value) in details {
        say!(Dark metadata_label(key), ": ", value);
    }
}

fn metadata_order(key: ErrorMetaDataKey) -> u8 {
    match key {
        ErrorMetaDataKey::GenerationStage => 0,
        ErrorMetaDataKey::ExpectedType => 1,
        ErrorMetaDataKey::FoundType => 2,
        ErrorMetaDataKey::ConflictingName => 3,
        ErrorMetaDataKey::TargetIdentifier => 4,
        ErrorMetaDataKey::PrimarySuggestion => 5,
        ErrorMetaDataKey::AlternativeSuggestion => 6,
    }
}

fn metadata_label(key: ErrorMetaDataKey) -> &'static str {
    match key {
        ErrorMetaDataKey::GenerationStage => "Stage",
        ErrorMetaDataKey::ExpectedType => "Expected",
        ErrorMetaDataKey::FoundType => "Found",
        ErrorMetaDataKey::ConflictingName => "Conflicts with",
        ErrorMetaDataKey::TargetIdentifier => "Identifier",
        ErrorMetaDataKey::PrimarySuggestion => "Suggestion",
        ErrorMetaDataKey::AlternativeSuggestion => "Alternatively",
    }
}
