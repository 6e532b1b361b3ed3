//! Static wiki/guide content.
//!
//! Compiled into the binary; the community guides change rarely and ship
//! with releases.

use serde::Serialize;

/// A wiki guide entry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GuideEntry {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    /// Markdown body
    pub body: &'static str,
}

pub const GUIDES: &[GuideEntry] = &[
    GuideEntry {
        slug: "getting-started",
        title: "Getting Started",
        summary: "Install the game, patch it, and join your first server.",
        body: "# Getting Started\n\n\
1. Install Battlefield 1942 and apply the community patch.\n\
2. Open the server browser and pick an **ACTIVE** server.\n\
3. Your stats start tracking the moment you finish your first round \
on a ranked server.\n\n\
Rounds on unranked servers still show in your history but never affect \
your RP score.",
    },
    GuideEntry {
        slug: "rank-system",
        title: "How Ranks Work",
        summary: "The RP scale, the 20 ranks, and what moves your score.",
        body: "# How Ranks Work\n\n\
Your skill rating (RP) sits on a 0-2000 scale and maps onto 20 military \
ranks from Private (PVT) to General (GEN).\n\n\
RP weighs objective play heaviest: flag work counts 30%, kill/death ratio \
25%, kills per minute 20%, win rate 10%, map variety 10%, and score per \
round 5%.\n\n\
You need 3 ranked rounds before a rank shows; until then you are \
*Provisional*. Going inactive for 60 days makes you Provisional again \
until your next round.",
    },
    GuideEntry {
        slug: "ranked-rounds",
        title: "Ranked and Unranked Rounds",
        summary: "Which rounds count towards RP and why some are skipped.",
        body: "# Ranked and Unranked Rounds\n\n\
A round is unranked when any of these apply:\n\n\
- Co-op gametype\n\
- Fewer than 4 players\n\
- Shorter than 2 minutes\n\
- No kills or deaths recorded\n\
- Flagged by bot-farming detection\n\n\
Unranked rounds still appear in round history with the reason shown.",
    },
    GuideEntry {
        slug: "server-hosting",
        title: "Hosting a Server",
        summary: "Get your server listed in the directory and ranked.",
        body: "# Hosting a Server\n\n\
Any public server appears in the directory automatically once the tracker \
sees it respond. To get **ranked** status, contact the admins on Discord \
so bot-farming detection can be enabled for your box.\n\n\
Servers that stop responding show as OFFLINE and drop to the bottom of \
the directory until they return.",
    },
    GuideEntry {
        slug: "challenges",
        title: "Community Challenges",
        summary: "Monthly community goals and how contributions count.",
        body: "# Community Challenges\n\n\
Challenges set a community-wide target for one stat over a fixed period, \
like 10,000 knife kills in a month. Everyone's ranked rounds contribute; \
the front-runner is shown on the challenge card.\n\n\
Finished challenges move to the history page with the final total and \
the top contributor.",
    },
];

/// Look up a guide by slug.
pub fn guide(slug: &str) -> Option<&'static GuideEntry> {
    GUIDES.iter().find(|g| g.slug == slug)
}
