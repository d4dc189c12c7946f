//! Prompt text sent to the generative service for each generative tool.

use crate::scene::tools::{Strength, Tool};

/// Prompt for `tool` at `strength`; `None` for tools that are not generative.
pub fn prompt_for(tool: Tool, strength: Strength) -> Option<String> {
    match tool {
        Tool::Shatter => Some(shatter_prompt(strength)),
        Tool::Ugly => Some(ugly_prompt(strength)),
        Tool::Skull => Some(skull_prompt(strength)),
        _ => None,
    }
}

pub fn shatter_prompt(strength: Strength) -> String {
    let s = strength.value();
    let text = if s <= 33 {
        "Apply a subtle network of fine, hair-like cracks to the person's skin, making it look like \
         delicate, aging porcelain. Preserve the original color and detail of the eyes."
    } else if s >= 67 {
        "Apply a hyper-realistic, heavily shattered stone texture to the person's skin. Create \
         deep, dark chasms and a desaturated, greyish, rocky appearance. Make the effect dramatic \
         but preserve the original color and detail of the eyes perfectly."
    } else {
        "Transform the person's skin into a cracked, dry earth texture. The cracks should be \
         noticeable and deep. The skin should look weathered. Preserve the original color and \
         detail of the eyes."
    };
    text.to_owned()
}

pub fn ugly_prompt(strength: Strength) -> String {
    let s = strength.value();
    let description = match s {
        0..=10 => {
            "add subtle, unflattering features. Think slightly greasy skin, a faint sneer instead \
             of their current expression, and shadows that make their eyes look colder and more \
             menacing. The changes should be very minimal, but distinctly negative."
        }
        11..=30 => {
            "introduce clear villainous traits. Give them sallow or unhealthy-looking skin, a \
             noticeable scowl or contemptuous expression, and make their eyes appear cruel and \
             unsettling. Perhaps add a small, poorly-healed scar."
        }
        31..=60 => {
            "significantly distort their features to be grotesque and evil. Introduce unnatural \
             skin textures like warts or blotches, yellowing and crooked teeth visible in a snarl, \
             and a deeply angry or hateful expression. The face should be asymmetrical and \
             unpleasant."
        }
        61..=80 => {
            "transform them into a monstrous creature. Add demonic or inhuman features like small \
             horns, glowing red eyes, or decaying skin. The features should be heavily distorted \
             and horrifying."
        }
        _ => {
            "make them a nightmarish, terrifying monster, barely recognizable as human. This is \
             maximum ugliness and evil. Think horrific mutations, a face contorted in pure malice, \
             and features that inspire fear and disgust. Do not hold back on the horror elements."
        }
    };
    format!(
        "Make the person in this image look ugly and evil. The intensity of this transformation \
         should be exactly {s} on a scale of 1 to 100.\n\
         At all levels, their expression must be negative, such as a scowl, sneer, or look of \
         pure malice. DO NOT make them smile or look happy.\n\n\
         Based on the strength value of {s}, {description}\n\n\
         Preserve the background, but apply these evil and ugly transformations to the person's \
         face and features."
    )
}

pub fn skull_prompt(strength: Strength) -> String {
    let s = strength.value();
    format!(
        "You are an expert special effects artist. Your task is to transform a person's face into \
         a photorealistic human skull. It is CRITICAL that you follow the strength parameter \
         precisely.\n\
         The transformation should look as if the skin is being peeled away or becoming \
         transparent to reveal the skull underneath.\n\n\
         The transformation strength is {s} on a scale of 1-100.\n\
         - If strength is 1-10: Reveal a very small, isolated part of the skull, like a patch on \
         the cheekbone or forehead. The effect should be subtle.\n\
         - If strength is around 50: Roughly half the face should be transformed. Create a \
         visually interesting boundary, like peeling or torn flesh, between the skin and the \
         exposed skull.\n\
         - If strength is 90-100: The entire face (skin, nose, eyes, lips) MUST be replaced by a \
         complete, photorealistic, and anatomically correct human skull.\n\n\
         CRITICAL INSTRUCTIONS: You MUST perfectly preserve the original background, hair, ears, \
         neck, and any clothing. The transformation must ONLY apply to the facial area. The \
         result must be photorealistic."
    )
}

#[cfg(test)]
#[path = "../../tests/unit/services/prompts.rs"]
mod tests;
