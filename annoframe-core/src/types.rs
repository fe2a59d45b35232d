//! Common frame type labels.
//!
//! Frame names are free-form strings; this enum collects the labels that
//! corpus readers and taggers produce most often so callers do not have to
//! repeat string literals.
//!
//! ```rust
//! use annoframe_core::{ClassMentionType, MentionGraph};
//!
//! let mut graph = MentionGraph::new();
//! let frame = graph.create_class_mention(ClassMentionType::Protein);
//! assert_eq!(
//!     ClassMentionType::from_label("protein"),
//!     Some(ClassMentionType::Protein)
//! );
//! # let _ = frame;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! class_mention_types {
    ($( $(#[$meta:meta])* $variant:ident => $label:literal, )*) => {
        /// Frequently used frame type labels.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[non_exhaustive]
        pub enum ClassMentionType {
            $( $(#[$meta])* $variant, )*
        }

        impl ClassMentionType {
            /// Every known type.
            pub const ALL: &'static [ClassMentionType] = &[$( Self::$variant, )*];

            /// Label used as the frame's mention name.
            #[must_use]
            pub const fn as_label(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )*
                }
            }
        }
    };
}

class_mention_types! {
    // Document structure
    /// Document title.
    DocumentTitle => "title",
    /// Section heading.
    SectionHeading => "section heading",
    /// Subsection heading.
    SubsectionHeading => "subsection heading",
    /// Table caption.
    TableLegend => "table caption",
    /// Figure caption.
    FigureLegend => "figure caption",
    /// Document section.
    Section => "section",
    /// Document subsection.
    Subsection => "subsection",

    // Syntactic units
    /// Token.
    Token => "token",
    /// Phrase.
    Phrase => "phrase",
    /// Clause.
    Clause => "clause",
    /// Sentence.
    Sentence => "sentence",
    /// Paragraph.
    Paragraph => "paragraph",

    // Biomedical entities
    /// Protein.
    Protein => "protein",
    /// Gene.
    Gene => "gene",
    /// Organ.
    Organ => "organ",
    /// Disease.
    Disease => "disease",
    /// Chemical.
    Chemical => "chemical",
    /// Cell type.
    CellType => "cell",
    /// Gene or gene product.
    GeneOrGeneProduct => "gene or gene product",
    /// Macromolecule.
    Macromolecule => "macromolecule",
    /// Nucleic acid.
    NucleicAcid => "nucleic acid",
    /// Cell line.
    CellLine => "cell line",
    /// Virus.
    Virus => "virus",
    /// Tissue.
    Tissue => "tissue",
    /// Subcellular location.
    SubcellularLocation => "subcellular location",
    /// Organism.
    Organism => "organism",
    /// DNA.
    Dna => "DNA",
    /// RNA.
    Rna => "RNA",
    /// Taxon.
    Taxon => "taxon",
    /// Transcript.
    Transcript => "transcript",
    /// Protein complex.
    ProteinComplex => "protein complex",
    /// mRNA.
    MRna => "mRNA",
    /// cDNA.
    CDna => "cDNA",
    /// Promoter.
    Promoter => "promoter",
    /// Malignancy.
    Malignancy => "malignancy",

    // Mutations and sequences
    /// Mutation event.
    MutationEvent => "mutation event",
    /// Substitution.
    Substitution => "substitution",
    /// Deletion.
    Deletion => "deletion",
    /// Insertion.
    Insertion => "insertion",
    /// Biological sequence.
    BiologicalSequence => "biological sequence",
    /// Polypeptide sequence.
    PolypeptideSequence => "polypeptide sequence",
    /// Position within a biological sequence.
    BiologicalSequencePosition => "biological sequence position",
    /// Amino acid.
    AminoAcid => "amino acid",
    /// Polypeptide.
    Polypeptide => "polypeptide",
    /// Variation event.
    VariationEvent => "variation-event",
    /// Variation type.
    VariationType => "variation-type",
}

impl ClassMentionType {
    /// Look up a type by its label (case-sensitive, labels such as "DNA" are
    /// upper case).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_label() == label)
    }
}

impl fmt::Display for ClassMentionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl From<ClassMentionType> for String {
    fn from(t: ClassMentionType) -> Self {
        t.as_label().to_string()
    }
}
